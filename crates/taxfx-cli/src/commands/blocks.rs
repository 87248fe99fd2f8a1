//! Blocks command - print the text blocks of a dump for anchor tuning.

use std::path::PathBuf;

use clap::Args;
use console::style;

use taxfx_core::locate::AnchorMatcher;
use taxfx_core::pdf::{BlockSource, JsonBlockDump};
use taxfx_core::TextBlock;

/// Arguments for the blocks command.
#[derive(Args)]
pub struct BlocksArgs {
    /// Block dump (JSON) of the document's pages
    #[arg(required = true)]
    blocks: PathBuf,

    /// Only show this page
    #[arg(short, long)]
    page: Option<u32>,

    /// Only show blocks containing this label (case-insensitive)
    #[arg(short, long)]
    label: Option<String>,
}

pub async fn run(args: BlocksArgs) -> anyhow::Result<()> {
    let mut pages = JsonBlockDump::from_file(&args.blocks)?.pages()?;
    pages.sort_by_key(|p| p.number);

    let matcher = args.label.as_deref().map(AnchorMatcher::new);

    for page in pages.iter().filter(|p| args.page.is_none_or(|n| n == p.number)) {
        println!("{}", style(format!("--- Page {} ---", page.number)).bold());

        match &matcher {
            None => {
                for block in &page.blocks {
                    println!("{}", format_block(block));
                }
            }
            Some(matcher) => {
                // Only the first match on a page acts as the anchor.
                for (i, block) in matcher.find_all(&page.blocks).into_iter().enumerate() {
                    let marker = if i == 0 { "*" } else { " " };
                    println!("{} {}", style(marker).green(), format_block(block));
                }
            }
        }
    }

    Ok(())
}

fn format_block(block: &TextBlock) -> String {
    let b = &block.bbox;
    format!(
        "[{:>7.1}, {:>7.1}, {:>7.1}, {:>7.1}] {:?}",
        b.x0, b.y0, b.x1, b.y1, block.text
    )
}
