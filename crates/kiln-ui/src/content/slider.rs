use std::any::Any;

use kiln_engine::canvas::Canvas;
use kiln_engine::config::{ConfigError, parse_finite_f32, parse_unified_vec2};
use kiln_engine::coords::{Rect, UnifiedVec2, Vec2};
use kiln_engine::input::{PointerEvent, PointerId};
use state::InitCell;

use crate::event::Event;
use crate::properties::{PropertyTable, fmt_unified};
use crate::resources::TextureInfo;

use super::{Content, DrawContext, PointerContext};

const DEFAULT_THUMB_SIZE: UnifiedVec2 = UnifiedVec2::from_components(1.5, 0.15, 0.0, 0.0);

/// Payload of [`Slider::changed`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SliderChanged {
    pub pointer: PointerId,
    pub value: f32,
}

/// A vertical bar with a thumb that follows the pointer.
///
/// The value is the pointer's height within the bar, clamped to `[0, 1]`.
/// A drag that starts on the bar keeps tracking after the pointer leaves it.
#[derive(Debug)]
pub struct Slider {
    value: f32,
    bar: Option<TextureInfo>,
    thumb: Option<TextureInfo>,
    /// Thumb size relative to the bar.
    thumb_size: UnifiedVec2,
    dragging: Option<PointerId>,

    pub changed: Event<SliderChanged>,
}

impl Default for Slider {
    fn default() -> Self {
        Self {
            value: 0.0,
            bar: None,
            thumb: None,
            thumb_size: DEFAULT_THUMB_SIZE,
            dragging: None,
            changed: Event::new(),
        }
    }
}

impl Slider {
    pub fn new(bar: TextureInfo, thumb: TextureInfo) -> Self {
        Self {
            bar: Some(bar),
            thumb: Some(thumb),
            ..Self::default()
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Clamped to `[0, 1]`. Does not notify [`changed`](Self::changed).
    pub fn set_value(&mut self, value: f32) {
        if value.is_finite() {
            self.value = value.clamp(0.0, 1.0);
        }
    }

    pub fn bar_texture(&self) -> Option<TextureInfo> {
        self.bar
    }

    pub fn set_bar_texture(&mut self, texture: Option<TextureInfo>) {
        self.bar = texture;
    }

    pub fn thumb_texture(&self) -> Option<TextureInfo> {
        self.thumb
    }

    pub fn set_thumb_texture(&mut self, texture: Option<TextureInfo>) {
        self.thumb = texture;
    }

    pub fn thumb_size(&self) -> UnifiedVec2 {
        self.thumb_size
    }

    pub fn set_thumb_size(&mut self, size: UnifiedVec2) {
        self.thumb_size = size;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Value under `position` for a bar occupying `rect`.
    pub fn value_at(rect: Rect, position: Vec2) -> f32 {
        if rect.size.y <= 0.0 {
            return 0.0;
        }
        ((position.y - rect.bottom()) / rect.size.y).clamp(0.0, 1.0)
    }

    /// Thumb rectangle, centred on the bar at the current value's height.
    pub fn thumb_rect(&self, rect: Rect) -> Rect {
        let size = self.thumb_size.resolve(rect.size);
        let centre = Vec2::new(
            rect.left() + rect.size.x * 0.5,
            rect.bottom() + rect.size.y * self.value,
        );
        Rect::from_origin_size(centre - size * 0.5, size)
    }

    fn track(&mut self, ctx: &PointerContext, event: &PointerEvent) {
        if ctx.rect.size.y <= 0.0 {
            return;
        }
        let value = Self::value_at(ctx.rect, event.position);
        if value != self.value {
            self.value = value;
            self.changed.notify(&SliderChanged { pointer: event.id, value });
        }
    }
}

static SLIDER_PROPERTIES: InitCell<PropertyTable<Slider>> = InitCell::new();

pub(crate) fn slider_properties() -> &'static PropertyTable<Slider> {
    SLIDER_PROPERTIES.get_or_init(|| {
        PropertyTable::<Slider>::new()
            .with(
                "Value",
                |s, v| parse_finite_f32(v).map(|x| s.set_value(x)),
                |s| s.value.to_string(),
            )
            .with(
                "UnifiedSliderSize",
                |s, v| parse_unified_vec2(v).map(|u| s.set_thumb_size(u)),
                |s| fmt_unified(s.thumb_size),
            )
    })
}

impl Content for Slider {
    fn kind(&self) -> &'static str {
        "Slider"
    }

    fn natural_size(&self) -> Option<Vec2> {
        self.bar.map(|t| t.size)
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, ctx: &DrawContext) {
        canvas.draw_box(ctx.rect, ctx.colour, self.bar.map(|t| t.id));
        let thumb = self.thumb_rect(ctx.rect);
        if !thumb.is_empty() {
            canvas.draw_box(thumb, ctx.colour, self.thumb.map(|t| t.id));
        }
    }

    fn pointer_down(&mut self, ctx: &PointerContext, event: &PointerEvent) {
        if ctx.inside && self.dragging.is_none() {
            self.dragging = Some(event.id);
            self.track(ctx, event);
        }
    }

    fn pointer_moved(&mut self, ctx: &PointerContext, event: &PointerEvent) {
        if self.dragging == Some(event.id) {
            self.track(ctx, event);
        }
    }

    fn pointer_up(&mut self, ctx: &PointerContext, event: &PointerEvent) {
        if self.dragging == Some(event.id) {
            self.track(ctx, event);
            self.dragging = None;
        }
    }

    fn apply_param(&mut self, key: &str, value: &str) -> Option<Result<(), ConfigError>> {
        slider_properties().apply(self, key, value)
    }

    fn properties(&self) -> Vec<(&'static str, String)> {
        slider_properties().describe(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use kiln_engine::coords::ColorRgba;

    use super::*;
    use crate::content::testing::FakeCanvas;

    const BAR: Rect = Rect::new(0.0, 100.0, 20.0, 200.0);

    fn ctx(inside: bool) -> PointerContext {
        PointerContext {
            rect: BAR,
            screen_size: Vec2::new(800.0, 600.0),
            inside,
        }
    }

    fn recorded(slider: &Slider) -> (Rc<RefCell<Vec<f32>>>, crate::event::Subscription) {
        let values = Rc::new(RefCell::new(Vec::new()));
        let v = Rc::clone(&values);
        let sub = slider.changed.subscribe(move |e| v.borrow_mut().push(e.value));
        (values, sub)
    }

    #[test]
    fn value_follows_pointer_height() {
        assert_eq!(Slider::value_at(BAR, Vec2::new(10.0, 150.0)), 0.25);
        assert_eq!(Slider::value_at(BAR, Vec2::new(10.0, 200.0)), 0.5);
        assert_eq!(Slider::value_at(BAR, Vec2::new(10.0, 0.0)), 0.0);
        assert_eq!(Slider::value_at(BAR, Vec2::new(10.0, 900.0)), 1.0);
        assert_eq!(Slider::value_at(Rect::new(0.0, 0.0, 10.0, 0.0), Vec2::new(0.0, 5.0)), 0.0);
    }

    #[test]
    fn drag_keeps_tracking_outside_the_bar() {
        let mut s = Slider::default();
        let (values, _sub) = recorded(&s);

        s.pointer_down(&ctx(true), &PointerEvent::mouse(10.0, 150.0));
        assert!(s.is_dragging());
        s.pointer_moved(&ctx(false), &PointerEvent::mouse(60.0, 400.0));
        s.pointer_up(&ctx(false), &PointerEvent::mouse(60.0, 400.0));

        assert!(!s.is_dragging());
        assert_eq!(s.value(), 1.0);
        assert_eq!(*values.borrow(), vec![0.25, 1.0]);
    }

    #[test]
    fn presses_outside_are_ignored() {
        let mut s = Slider::default();
        let (values, _sub) = recorded(&s);

        s.pointer_down(&ctx(false), &PointerEvent::mouse(50.0, 150.0));
        s.pointer_moved(&ctx(true), &PointerEvent::mouse(10.0, 200.0));
        assert!(!s.is_dragging());
        assert_eq!(s.value(), 0.0);
        assert!(values.borrow().is_empty());
    }

    #[test]
    fn other_pointers_do_not_move_the_thumb() {
        let mut s = Slider::default();
        s.pointer_down(&ctx(true), &PointerEvent::touch(1, 10.0, 200.0));
        s.pointer_moved(&ctx(true), &PointerEvent::touch(2, 10.0, 280.0));
        assert_eq!(s.value(), 0.5);
    }

    #[test]
    fn thumb_is_centred_at_the_value() {
        let mut s = Slider::default();
        s.set_value(0.5);
        // 1.5 * 20 = 30 wide, 0.15 * 200 = 30 tall, centred at (10, 200).
        assert_eq!(s.thumb_rect(BAR), Rect::new(-5.0, 185.0, 30.0, 30.0));

        let mut canvas = FakeCanvas::default();
        s.draw(
            &mut canvas,
            &DrawContext { rect: BAR, colour: ColorRgba::white(), scale: Vec2::one() },
        );
        assert_eq!(canvas.boxes, vec![BAR, Rect::new(-5.0, 185.0, 30.0, 30.0)]);
    }

    #[test]
    fn params_apply_and_describe() {
        let mut s = Slider::default();
        assert_eq!(s.apply_param("Value", "2"), Some(Ok(())));
        assert_eq!(s.value(), 1.0);
        assert_eq!(s.apply_param("UnifiedSliderSize", "1, 0, 0, 12"), Some(Ok(())));
        assert_eq!(s.thumb_size(), UnifiedVec2::from_components(1.0, 0.0, 0.0, 12.0));
        assert!(matches!(s.apply_param("Value", "NaN"), Some(Err(ConfigError::InvalidNumber(_)))));
        assert!(s.properties().contains(&("UnifiedSliderSize", "1, 0, 0, 12".to_string())));
    }
}
