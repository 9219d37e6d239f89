fn main() {
    if let Err(err) = domain_tally::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
