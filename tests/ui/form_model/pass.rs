use formwork::{FieldValue, FormModel};

#[derive(Clone, formwork::FormModel)]
struct DemoForm {
    email: String,
    remember: bool,
}

fn main() {
    let fields = DemoForm::fields();
    assert_eq!(fields.email().as_str(), "email");
    assert_eq!(fields.remember().as_str(), "remember");

    let model = DemoForm {
        email: "a@b.com".to_string(),
        remember: true,
    };
    let values = model.field_values();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].1, FieldValue::Text("a@b.com".to_string()));
    assert_eq!(values[1].1, FieldValue::Toggle(true));
}
