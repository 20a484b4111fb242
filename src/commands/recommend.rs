// Recommend command handler
use super::OutputOptions;
use crate::observatory::Observatory;

pub fn handle_recommend_command(
    observatory: &Observatory,
    model: &str,
    complexity: &str,
    options: OutputOptions,
) -> anyhow::Result<()> {
    let recommendation = observatory.recommend(model, complexity)?;
    println!("{}", options.render(&recommendation)?);
    Ok(())
}
