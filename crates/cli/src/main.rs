fn main() {
    if let Err(e) = protoscope_cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
