#[derive(Clone, formwork::FormModel)]
struct Generic<T> {
    value: T,
}

fn main() {}
