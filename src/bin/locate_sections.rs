//! CLI tool for locating record sections on PDF pages

use pdf_section_locator::mapper::PageViewport;
use pdf_section_locator::overlay::{highlights_for_page, render_svg, Palette};
use pdf_section_locator::{filter_by_page, locate, parse_record, LocatorConfig, PdfDocument, Section};
use std::env;
use std::fs;
use std::path::Path;
use std::process;
use std::time::Instant;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <pdf_file> <record.json> [--json] [--width N] [--svg DIR]", program);
    eprintln!();
    eprintln!("Finds the headings named by the record's keys and prints their page regions.");
    process::exit(1);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage(&args[0]);
    }

    let pdf_path = &args[1];
    let record_path = &args[2];
    let mut json_output = false;
    let mut svg_dir: Option<String> = None;
    let mut config = LocatorConfig::default();

    let mut rest = args[3..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--json" => json_output = true,
            "--width" => match rest.next().and_then(|w| w.parse::<f32>().ok()) {
                Some(width) if width > 0.0 => config.display_width = width,
                _ => usage(&args[0]),
            },
            "--svg" => match rest.next() {
                Some(dir) => svg_dir = Some(dir.clone()),
                None => usage(&args[0]),
            },
            _ => usage(&args[0]),
        }
    }

    let record = match fs::read_to_string(record_path)
        .map_err(pdf_section_locator::SectionError::from)
        .and_then(|json| parse_record(&json))
    {
        Ok(record) => record,
        Err(e) => {
            eprintln!("Error: {}: {}", record_path, e);
            process::exit(1);
        }
    };

    let start = Instant::now();

    let result = PdfDocument::load(pdf_path).and_then(|doc| {
        let sections = locate(&doc, &record, &config)?;
        Ok((doc, sections))
    });

    let (doc, sections) = match result {
        Ok(found) => found,
        Err(e) => {
            if json_output {
                println!("{}", serde_json::json!({ "error": e.to_string() }));
            } else {
                eprintln!("Error: {}", e);
                eprintln!("No sections available; fix the document and run again.");
            }
            process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    if let Some(dir) = &svg_dir {
        if let Err(e) = write_overlays(&doc, &sections, &config, Path::new(dir)) {
            eprintln!("Error writing overlays: {}", e);
            process::exit(1);
        }
    }

    if json_output {
        let output = serde_json::json!({
            "page_count": doc.page_count(),
            "display_width": config.display_width,
            "processing_time_ms": elapsed.as_millis() as u64,
            "sections": sections,
        });
        println!("{}", output);
        return;
    }

    println!("Section Location Results");
    println!("========================");
    println!("File: {}", pdf_path);
    println!("Record: {}", record_path);
    println!("Pages: {}", doc.page_count());
    println!("Processing time: {}ms", elapsed.as_millis());

    for page in 1..=doc.page_count() {
        let on_page = filter_by_page(&sections, page);
        if on_page.is_empty() {
            continue;
        }
        println!();
        println!("--- Page {} ---", page);
        for s in &on_page {
            println!(
                "  {:<20} y={:7.1} height={:7.1} x={:6.1} width={:6.1}",
                s.label, s.y, s.height, s.x, s.width
            );
        }
    }

    if sections.is_empty() {
        println!();
        println!("No sections found.");
    }
}

fn write_overlays(
    doc: &PdfDocument,
    sections: &[Section],
    config: &LocatorConfig,
    dir: &Path,
) -> Result<(), pdf_section_locator::SectionError> {
    fs::create_dir_all(dir)?;
    let palette = Palette::new();
    for page in 1..=doc.page_count() {
        let viewport = PageViewport::new(doc.page_geometry(page)?, config.display_width);
        let highlights = highlights_for_page(sections, page, &palette);
        let svg = render_svg(viewport.pixel_width(), viewport.pixel_height(), &highlights);
        let path = dir.join(format!("page-{}.svg", page));
        fs::write(&path, svg)?;
        log::debug!("wrote {}", path.display());
    }
    Ok(())
}
