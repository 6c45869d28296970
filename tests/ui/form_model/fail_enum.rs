#[derive(Clone, formwork::FormModel)]
enum Choice {
    One,
}

fn main() {}
