use kernel_macros::value_object;

#[value_object(scalar)]
struct Code(String);

#[value_object(scalar, default = false)]
struct Quantity(u32);

fn main() {
    let code = Code::new("A-1");
    assert_eq!(code.value(), "A-1");
    assert_eq!(code.to_string(), "A-1");
    assert_eq!(code.as_ref(), "A-1");

    let mut set = std::collections::HashSet::new();
    set.insert(code.clone());
    assert!(set.contains(&Code::from("A-1".to_string())));

    let raw: String = code.into();
    assert_eq!(raw, "A-1");

    let q = Quantity::new(3u32);
    assert_eq!(*q.value(), 3);
}
