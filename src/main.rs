fn main() {
    if let Err(err) = vsmgen::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
