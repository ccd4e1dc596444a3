fn main() {
    if let Err(err) = firecheck_lib::run() {
        eprintln!("firecheck: {err:#}");
        std::process::exit(1);
    }
}
