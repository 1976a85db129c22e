fn main() -> anyhow::Result<()> {
    gbamap::run()
}
