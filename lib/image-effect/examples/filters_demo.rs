use image::{Rgb, RgbImage};
use image_effect::{Effect, Filter, stylized::CartoonConfig};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    // Colourful gradient with a dark square in the middle
    let img = RgbImage::from_fn(400, 300, |x, y| {
        if (150..250).contains(&x) && (100..200).contains(&y) {
            Rgb([20, 20, 40])
        } else {
            Rgb([(x * 255 / 400) as u8, (y * 255 / 300) as u8, ((x + y) * 255 / 700) as u8])
        }
    });

    for filter in Filter::all() {
        let output = filter.apply(&img)?;
        let filename = format!("demo_{}.png", filter.suffix());
        output.save(output_dir.join(&filename))?;

        println!("✓ Generated {}", filename);
    }

    let plain = CartoonConfig::new().with_overlay_edges(false).apply(&img)?;
    plain.save(output_dir.join("demo_cartoon_plain.png"))?;
    println!("✓ Generated demo_cartoon_plain.png");

    println!("\n✓ All filters applied successfully!");
    println!("  Images saved to: tmp/");

    Ok(())
}
