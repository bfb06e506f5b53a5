fn main() -> anyhow::Result<()> {
    rasterpad::run()?;
    Ok(())
}
