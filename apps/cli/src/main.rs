fn main() -> anyhow::Result<()> {
    zhlib_cli::run()
}
