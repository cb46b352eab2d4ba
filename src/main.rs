fn main() -> anyhow::Result<()> {
    daybook::cli::run()
}
