fn main() -> anyhow::Result<()> {
    spectra_tall::cli::run()
}
