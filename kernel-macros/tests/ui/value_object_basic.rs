use kernel_macros::value_object;

#[value_object]
struct Amount {
    value: i64,
}

#[value_object(debug = false)]
struct NonDebugVO(i32);

#[value_object(default = false)]
struct Email {
    address: String,
}

#[value_object]
enum Level {
    #[default]
    Low,
    High,
}

fn main() {
    // Debug 默认开启
    let _ = format!("{:?}", Amount { value: 0 });

    let a = Amount::default();
    let _b = a.clone();
    let _eq = a == Amount { value: 0 };

    let _ = NonDebugVO(1);

    // default = false 时不派生 Default，只做构造
    let e = Email { address: "a@b.c".to_string() };
    let _ = serde_json::to_string(&e);

    let _lv: Level = Default::default();
    let _ = Level::High;
}
