//! Parameter listing command.

use clap::Args;
use hallverb_config::resolve_param;
use hallverb_effects::HallParam;

#[derive(Args)]
pub struct ParamsArgs {
    /// Show details for one parameter
    #[arg(value_name = "PARAM")]
    param: Option<String>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    if let Some(key) = &args.param {
        let param = resolve_param(key)?;
        let desc = param.descriptor();
        let suffix = desc.unit.suffix();

        println!("{}", desc.name);
        println!("{}", "=".repeat(desc.name.len()));
        println!();
        println!("  Key:      {}", param.key());
        println!("  Host key: {}", param.host_key());
        println!("  Default:  {}{suffix}", desc.default);
        println!("  Range:    {}{suffix} .. {}{suffix}", desc.min, desc.max);
        if param.is_deferred() {
            println!();
            println!("  Applied at the start of the next processed block.");
        }
        println!();
        println!("Example:");
        println!(
            "  hallverb process input.wav output.wav --param {}={}",
            param.key(),
            desc.default
        );
        return Ok(());
    }

    println!("Parameters");
    println!("==========");
    println!();
    println!("  {:26}  {:>10}  {:>22}", "Key", "Default", "Range");
    println!("  {:26}  {:>10}  {:>22}", "---", "-------", "-----");
    for param in HallParam::ALL {
        let desc = param.descriptor();
        let marker = if param.is_deferred() { "*" } else { "" };
        println!(
            "  {:26}  {:>10}  {:>22}",
            format!("{}{marker}", param.key()),
            format!("{}{}", desc.default, desc.unit.suffix()),
            format!("{} .. {}", desc.min, desc.max),
        );
    }
    println!();
    println!("* applied at the start of the next processed block");
    Ok(())
}
