fn main() -> anyhow::Result<()> {
    tinyroute::cli::run_cli()
}
