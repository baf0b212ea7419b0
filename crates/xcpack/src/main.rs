fn main() -> anyhow::Result<()> {
    xcpack::run()
}
