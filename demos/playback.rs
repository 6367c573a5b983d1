//! Bus Playback Example
//!
//! This example plays a CAN frame, an I2C read and an SPI exchange in real
//! time, printing the transaction log as it grows, and writes each timing
//! diagram to an SVG file in the temp directory.
//!
//! Run with: `RUST_LOG=info cargo run --example playback`

use busline::can::CanInput;
use busline::i2c::{AckType, I2cConfig};
use busline::playback::SystemClock;
use busline::render::SvgSurface;
use busline::spi::{Cpha, Cpol, SpiConfig};
use busline::{Session, SessionOptions, TransactionConfig};

fn main() -> busline::Result<()> {
    env_logger::init();
    println!("=== Bus Playback Example ===\n");

    // Example 1: Standard CAN data frame
    let frame = CanInput {
        message_id: String::from("123"),
        data_length: 2,
        data: String::from("ABCD"),
        ..CanInput::default()
    }
    .parse()?;
    play("can_frame", frame.into(), 5)?;

    // Example 2: I2C read, master ends with NACK
    play("i2c_read", I2cConfig::read(0x50, 0xA5, AckType::Nack)?.into(), 20)?;

    // Example 3: SPI mode 3
    play(
        "spi_mode3",
        SpiConfig::new(Cpol::Idle1, Cpha::Trailing, 0x0F, 0xF0).into(),
        20,
    )?;

    println!("\n=== All examples completed successfully! ===");
    Ok(())
}

fn play(name: &str, config: TransactionConfig, speed_ms: i64) -> busline::Result<()> {
    println!("--- {name} ({}) ---", config.protocol());

    let options = SessionOptions::default().with_speed_ms(speed_ms);
    let mut session = Session::new(SvgSurface::new(), SystemClock::new(), options);
    session.configure(config);

    for field in session.frame_structure() {
        println!("  {:<20} {:>3} bits  {}", field.name, field.bits, field.value);
    }

    session.start()?;
    let mut printed = 0;
    while session.pump() {
        let lines = session.log().lines();
        for line in &lines[printed..] {
            println!("  {line}");
        }
        printed = lines.len();
        if session.state().is_running() {
            println!("      {}", session.line_labels().join("  "));
        }
    }

    let path = std::env::temp_dir().join(format!("{name}.svg"));
    let svg = session.into_surface().into_document();
    if let Err(e) = std::fs::write(&path, svg) {
        eprintln!("  Could not write {}: {e}", path.display());
    } else {
        println!("  Diagram written to {}\n", path.display());
    }
    Ok(())
}
