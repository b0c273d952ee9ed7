use pdf_section_locator::{LocatorConfig, PageSource, PdfDocument};
use std::env;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: debug_tokens <pdf_path> [max_page | min-max] [--width N]");
        std::process::exit(1);
    }

    let range = args.get(2).map(|s| s.as_str()).unwrap_or("1-3");
    let (min_page, max_page) = if let Some((a, b)) = range.split_once('-') {
        (a.parse().unwrap_or(1), b.parse().unwrap_or(3))
    } else {
        (1, range.parse().unwrap_or(3))
    };
    let width = args
        .iter()
        .position(|a| a == "--width")
        .and_then(|i| args.get(i + 1))
        .and_then(|w| w.parse::<f32>().ok())
        .unwrap_or(LocatorConfig::default().display_width);

    let doc = PdfDocument::load(&args[1]).expect("Failed to load PDF");
    let max_page = max_page.min(doc.page_count());

    for page in min_page..=max_page {
        let page_tokens = doc.page_tokens(page, width).expect("Failed to extract page");
        println!(
            "=== PAGE {} ({} tokens, scale {:.3}, {:.0}x{:.0}px) ===",
            page,
            page_tokens.tokens.len(),
            page_tokens.scale(),
            page_tokens.pixel_width(),
            page_tokens.pixel_height()
        );
        for token in &page_tokens.tokens {
            match page_tokens.viewport.map_token(token) {
                Some(mapped) => println!(
                    "  x={:7.1} y={:7.1} h={:5.1} -> px y={:7.1} h={:5.1} text={:?}",
                    token.x, token.y, token.height, mapped.y, mapped.height, token.text
                ),
                None => println!("  unmappable text={:?}", token.text),
            }
        }
        println!();
    }
}
