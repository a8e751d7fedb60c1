fn main() {
    if let Err(err) = csv_fill::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
