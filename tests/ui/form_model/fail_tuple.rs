#[derive(Clone, formwork::FormModel)]
struct Tuple(String);

fn main() {}
