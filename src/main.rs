fn main() {
    if let Err(err) = astflow::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
