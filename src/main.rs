fn main() {
    if let Err(e) = certyfikaty::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
