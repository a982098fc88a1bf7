fn main() {
    if let Err(err) = hostmap_renderer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
