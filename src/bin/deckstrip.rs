use std::io::{self, BufRead, Write as _};

use anyhow::Context as _;
use deckstrip::{Chapter, Deck, RenderOpts, render_deck};

fn prompt(input: &mut impl BufRead, message: &str) -> anyhow::Result<String> {
    print!("{message}");
    io::stdout().flush().context("flush stdout")?;
    let mut line = String::new();
    let n = input.read_line(&mut line).context("read from stdin")?;
    if n == 0 {
        anyhow::bail!("unexpected end of input");
    }
    Ok(line.trim().to_string())
}

fn main() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let count: usize = prompt(&mut input, "Enter the number of chapters: ")?
        .parse()
        .context("chapter count must be a positive integer")?;
    if count == 0 {
        anyhow::bail!("chapter count must be a positive integer");
    }

    let mut chapters = Vec::with_capacity(count);
    for i in 0..count {
        let name = prompt(&mut input, &format!("Enter the name of chapter {}: ", i + 1))?;
        let slide_count: u32 = prompt(
            &mut input,
            &format!("Enter the number of slides in chapter '{name}': "),
        )?
        .parse()
        .context("slide count must be a positive integer")?;
        chapters.push(Chapter { name, slide_count });
    }

    let font = prompt(
        &mut input,
        "Enter the path to a label font (blank for system default): ",
    )?;

    let deck = Deck::new(chapters)?;
    let mut opts = RenderOpts::default();
    if !font.is_empty() {
        opts.font_path = Some(font.into());
    }

    let stats = render_deck(&deck, &opts)?;
    eprintln!(
        "wrote {} slide images to {}",
        stats.slides_written,
        opts.out_dir.display()
    );
    Ok(())
}
