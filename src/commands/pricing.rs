// Pricing command handler
use super::OutputOptions;
use crate::observatory::Observatory;

pub fn handle_pricing_command(observatory: &Observatory, options: OutputOptions) -> anyhow::Result<()> {
    println!("{}", options.render(observatory.pricing())?);
    Ok(())
}
