use kernel_domain::notification::{NotificationContext, NotificationKind};
use kernel_domain::value_object::{EnumValueObject, ValueObject};
use kernel_macros::enum_value_object;

#[enum_value_object(unknown = NotificationKind::new("InvalidColorNotification"))]
pub enum Color {
    Unknown = 0,
    DarkRed = 1,
    Blue = 2,
}

#[enum_value_object(
    unknown = NotificationKind::new("InvalidShapeNotification"),
    type_name = "Forma"
)]
pub enum Shape {
    Circle = 1,
    Unset = 0,
}

fn main() {
    assert_eq!(Color::default(), Color::Unknown);
    assert_eq!(Color::DarkRed.value(), 1);
    assert_eq!(Color::DarkRed.name(), "DARK_RED");
    assert_eq!(Color::DarkRed.to_string(), "DARK_RED");
    assert_eq!(Color::variants().len(), 3);
    assert_eq!(Color::from_value(2), Color::Blue);
    assert_eq!(Color::from_value(99), Color::Unknown);
    assert_eq!(Color::Blue.description_key(), "Color.BLUE");

    let mut ctx = NotificationContext::new("Paint");
    assert!(!Color::Unknown.is_valid(Some("color"), Some(&mut ctx)));
    assert_eq!(ctx.len(), 1);
    assert!(Color::Blue.is_valid(Some("color"), Some(&mut ctx)));

    assert_eq!(Shape::default(), Shape::Unset);
    assert_eq!(Shape::Circle.description_key(), "Forma.CIRCLE");
    assert_eq!(serde_json::to_string(&Color::DarkRed).ok().as_deref(), Some("\"DARK_RED\""));
}
