use crate::config::Config;
use crate::geometry::tolerance::{clamp, MAX_GRID_LINES, MIN_CENTER_SPAN, MIN_GRID_PX, MIN_SCALE_FLOOR, VIEW_MARGIN};
use crate::model::{Graph, Point};
use serde::Serialize;

/// Zoom and pan of the drawing area.
///
/// Screen coordinates follow `sx = xs·(xt + s·gx)` and `sy = ys·(yt + s·(H − gy))`,
/// so graph y grows upwards while screen y grows downwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct View {
    pub scale: f64,
    pub x_scale: f64,
    pub y_scale: f64,
    pub x_trans: f64,
    pub y_trans: f64,
    pub box_width: f64,
    pub box_height: f64,
    pub graph_width: f64,
    pub graph_height: f64,
    pub zoom_intensity: f64,
    pub trans_step: f64,
}

/// Grid lines to draw for the visible part of the box, in graph units.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GridLines {
    pub step: f64,
    pub vertical: Vec<f64>,
    pub horizontal: Vec<f64>,
}

impl View {
    pub fn new(config: &Config) -> View {
        View {
            scale: 1.0,
            x_scale: 1.0,
            y_scale: 1.0,
            x_trans: 0.0,
            y_trans: 0.0,
            box_width: config.viewport.width,
            box_height: config.viewport.height,
            graph_width: 0.0,
            graph_height: 0.0,
            zoom_intensity: config.zoom_intensity,
            trans_step: config.trans_step,
        }
    }

    /// Adopts a freshly loaded graph and centers on it.
    pub fn fit_graph(&mut self, g: &Graph, axis_scales: (f64, f64)) {
        self.graph_width = g.width;
        self.graph_height = g.height;
        self.x_scale = axis_scales.0;
        self.y_scale = axis_scales.1;
        self.center(g);
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.box_width = width;
        self.box_height = height;
        self.scale = clamp(self.scale, self.min_scale(), self.max_scale());
    }

    #[inline] pub fn x_coord(&self, gx: f64) -> f64 { self.x_scale * (self.x_trans + self.scale * gx) }
    #[inline] pub fn y_coord(&self, gy: f64) -> f64 { self.y_scale * (self.y_trans + self.scale * (self.graph_height - gy)) }
    #[inline] pub fn x_coord_inv(&self, sx: f64) -> f64 { (sx / self.x_scale - self.x_trans) / self.scale }
    #[inline] pub fn y_coord_inv(&self, sy: f64) -> f64 { self.graph_height - (sy / self.y_scale - self.y_trans) / self.scale }

    pub fn to_screen(&self, p: Point) -> Point { Point::new(self.x_coord(p.x), self.y_coord(p.y)) }

    pub fn to_graph(&self, p: Point) -> Point { Point::new(self.x_coord_inv(p.x), self.y_coord_inv(p.y)) }

    /// Scale fitting the whole box into the viewport less the margin. Positive even for tiny viewports.
    fn fit_limit(&self) -> f64 {
        let fit = ((self.box_width - VIEW_MARGIN) / self.graph_width).min((self.box_height - VIEW_MARGIN) / self.graph_height);
        if fit > MIN_SCALE_FLOOR { fit } else { MIN_SCALE_FLOOR }
    }

    pub fn min_scale(&self) -> f64 {
        (self.box_width.max(self.box_height) / 10.0).min(self.fit_limit())
    }

    pub fn max_scale(&self) -> f64 {
        1f64.max(self.box_width / 5.0).max(self.box_height / 5.0).max(self.fit_limit())
    }

    /// Fits the node extents (at least `MIN_CENTER_SPAN` wide) into the viewport.
    pub fn center(&mut self, g: &Graph) {
        let (mut minx, mut miny, mut maxx, mut maxy) = (g.width, g.height, 0.0f64, 0.0f64);
        for n in &g.nodes {
            minx = minx.min(n.x); maxx = maxx.max(n.x);
            miny = miny.min(n.y); maxy = maxy.max(n.y);
        }
        let xdist = self.x_scale * (maxx - minx).max(MIN_CENTER_SPAN);
        let ydist = self.y_scale * (maxy - miny).max(MIN_CENTER_SPAN);
        let fit = ((self.box_width - VIEW_MARGIN) * self.x_scale / xdist)
            .min((self.box_height - VIEW_MARGIN) * self.y_scale / ydist);
        self.scale = fit.min(self.max_scale()).max(self.min_scale());
        self.x_trans = -((minx + maxx) / 2.0) * self.scale + (self.box_width / 2.0) / self.x_scale;
        self.y_trans = -(g.height - (miny + maxy) / 2.0) * self.scale + (self.box_height / 2.0) / self.y_scale;
    }

    /// Multiplies the scale by `zoom`, keeping the screen point `(sx, sy)` fixed.
    fn zoom_about(&mut self, sx: f64, sy: f64, zoom: f64) {
        let mx = sx - self.x_scale * self.x_trans;
        let my = sy - self.y_scale * self.y_trans;
        self.x_trans -= (mx * zoom - mx) / self.x_scale;
        self.y_trans -= (my * zoom - my) / self.y_scale;
        self.scale *= zoom;
    }

    /// Wheel zoom by `steps` notches around the pointer.
    pub fn zoom_wheel(&mut self, sx: f64, sy: f64, steps: f64) -> bool {
        if steps == 0.0 || !steps.is_finite() {
            return false;
        }
        let zoom = (steps * self.zoom_intensity).exp()
            .min(self.max_scale() / self.scale)
            .max(self.min_scale() / self.scale);
        self.zoom_about(sx, sy, zoom);
        true
    }

    pub fn zoom_in(&mut self) {
        let zoom = self.zoom_intensity.exp().min(self.max_scale() / self.scale);
        self.zoom_about(self.box_width / 2.0, self.box_height / 2.0, zoom);
    }

    pub fn zoom_out(&mut self) {
        let zoom = (-self.zoom_intensity).exp().max(self.min_scale() / self.scale);
        self.zoom_about(self.box_width / 2.0, self.box_height / 2.0, zoom);
    }

    fn slider_base(&self) -> f64 { (1.0 + self.zoom_intensity).ln() }

    pub fn max_slider(&self) -> f64 {
        ((self.max_scale() / self.min_scale()).ln() / self.slider_base()).ceil()
    }

    pub fn slider_value(&self) -> f64 {
        ((self.scale / self.min_scale()).ln() / self.slider_base()).ceil()
    }

    /// Absolute zoom from a slider position, around the viewport center.
    pub fn zoom_to_slider(&mut self, value: f64) {
        let target = clamp(
            self.min_scale() * (value * self.slider_base()).exp(),
            self.min_scale(),
            self.max_scale(),
        );
        let zoom = target / self.scale;
        self.zoom_about(self.box_width / 2.0, self.box_height / 2.0, zoom);
        self.scale = target;
    }

    /// Arrow-key pan by whole steps.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x_trans += dx * self.trans_step;
        self.y_trans += dy * self.trans_step;
    }

    /// Rendered grid spacing: at least `MIN_GRID_PX` apart, at most `MAX_GRID_LINES` lines.
    pub fn render_granularity(&self, granularity: f64) -> f64 {
        let mut rg = granularity;
        if rg * self.scale < MIN_GRID_PX {
            rg = (MIN_GRID_PX / self.scale).ceil();
        }
        let extent = self.graph_width.max(self.graph_height);
        if extent / rg > MAX_GRID_LINES {
            rg = extent / MAX_GRID_LINES;
        }
        rg
    }

    pub fn grid_lines(&self, granularity: f64) -> GridLines {
        let step = self.render_granularity(granularity);
        if !(step > 0.0) || !step.is_finite() {
            return GridLines::default();
        }
        let gx0 = self.x_coord_inv(0.0).max(0.0);
        let gx1 = self.x_coord_inv(self.box_width).min(self.graph_width);
        // screen y grows downwards, so the bottom edge holds the smaller graph y
        let gy0 = self.y_coord_inv(self.box_height).max(0.0);
        let gy1 = self.y_coord_inv(0.0).min(self.graph_height);
        GridLines { step, vertical: lines(gx0, gx1, step), horizontal: lines(gy0, gy1, step) }
    }
}

fn lines(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let mut out = Vec::new();
    let mut k = (lo / step).ceil();
    while k * step <= hi {
        out.push(k * step);
        k += 1.0;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::parse_descriptor;

    fn view_for(doc: &str) -> (View, Graph) {
        let g = parse_descriptor(doc).unwrap();
        let mut v = View::new(&Config::default());
        v.fit_graph(&g, (1.0, 1.0));
        (v, g)
    }

    #[test]
    fn scale_bounds_for_default_viewport() {
        let (v, _) = view_for(r#"{"nodes":[{"id":0,"x":0,"y":0}],"edges":[],"width":100,"height":100}"#);
        assert!((v.min_scale() - 5.2).abs() < 1e-12);
        assert!((v.max_scale() - 120.0).abs() < 1e-12);
    }

    #[test]
    fn center_puts_node_midpoint_at_viewport_center() {
        let (v, _) = view_for(r#"{"nodes":[{"id":0,"x":10,"y":10},{"id":1,"x":30,"y":50}],"edges":[],"width":100,"height":100}"#);
        let mid = v.to_screen(Point::new(20.0, 30.0));
        assert!((mid.x - 300.0).abs() < 1e-9);
        assert!((mid.y - 300.0).abs() < 1e-9);
        assert!(v.scale >= v.min_scale() && v.scale <= v.max_scale());
    }

    #[test]
    fn wheel_zoom_keeps_pointer_fixed() {
        let (mut v, _) = view_for(r#"{"nodes":[{"id":0,"x":0,"y":0},{"id":1,"x":100,"y":100}],"edges":[],"width":1000,"height":1000}"#);
        let before = v.to_graph(Point::new(123.0, 456.0));
        assert!(v.zoom_wheel(123.0, 456.0, 1.0));
        let after = v.to_graph(Point::new(123.0, 456.0));
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
        assert!(!v.zoom_wheel(123.0, 456.0, 0.0));
    }

    #[test]
    fn zoom_is_clamped() {
        let (mut v, _) = view_for(r#"{"nodes":[{"id":0,"x":0,"y":0}],"edges":[],"width":100,"height":100}"#);
        for _ in 0..200 { v.zoom_in(); }
        assert!((v.scale - v.max_scale()).abs() < 1e-9);
        for _ in 0..200 { v.zoom_out(); }
        assert!((v.scale - v.min_scale()).abs() < 1e-9);
    }

    #[test]
    fn slider_maps_logarithmically() {
        let (mut v, _) = view_for(r#"{"nodes":[{"id":0,"x":0,"y":0}],"edges":[],"width":100,"height":100}"#);
        v.zoom_to_slider(3.0);
        let expected = v.min_scale() * 1.2f64.powi(3);
        assert!((v.scale - expected).abs() < 1e-9);
        v.zoom_to_slider(v.max_slider() + 10.0);
        assert_eq!(v.scale, v.max_scale());
    }

    #[test]
    fn viewport_smaller_than_margin_keeps_orientation() {
        let g = parse_descriptor(r#"{"nodes":[{"id":0,"x":0,"y":0},{"id":1,"x":50,"y":50}],"edges":[],"width":100,"height":100}"#).unwrap();
        let mut v = View::new(&Config::default());
        v.fit_graph(&g, (1.0, 1.0));
        v.set_viewport(60.0, 60.0);
        v.center(&g);
        assert!(v.min_scale() > 0.0);
        assert!(v.scale > 0.0);
        let a = v.to_screen(Point::new(0.0, 0.0));
        let b = v.to_screen(Point::new(50.0, 50.0));
        assert!(b.x > a.x && b.y < a.y);
        assert!(v.max_slider().is_finite());
    }

    #[test]
    fn render_granularity_never_below_ten_pixels() {
        let (mut v, _) = view_for(r#"{"nodes":[{"id":0,"x":0,"y":0}],"edges":[]}"#);
        v.scale = 0.5;
        assert_eq!(v.render_granularity(1.0), 100.0);
        v.scale = 20.0;
        assert_eq!(v.render_granularity(1.0), 100.0); // capped by line count on a 1e6 box
        v.graph_width = 100.0; v.graph_height = 100.0;
        assert_eq!(v.render_granularity(1.0), 1.0);
    }
}
