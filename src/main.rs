fn main() {
    if let Err(err) = tessera::cli::run() {
        eprintln!("tessera error: {:#}", err);
        std::process::exit(1);
    }
}
