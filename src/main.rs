#[cfg(feature = "pdf")]
mod cli;

#[cfg(feature = "pdf")]
fn main() -> anyhow::Result<()> {
    cli::run()
}

#[cfg(not(feature = "pdf"))]
fn main() {
    eprintln!("boxcutter was built without the `pdf` feature; rebuild with --features pdf");
    std::process::exit(1);
}
