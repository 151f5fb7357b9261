fn main() {
    if let Err(err) = inventory_managed::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
