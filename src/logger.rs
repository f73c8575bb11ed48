use env_logger::fmt::{Color, Formatter};
use env_logger::Builder;
use log::{Level, LevelFilter, Record};
use std::io::Write;

const SUCCESS_TINT: (u8, u8, u8) = (0, 255, 0); // pure green

/// 50 / 50 blend of two RGB colors
#[inline]
fn blend((r1, g1, b1): (u8, u8, u8), (r2, g2, b2): (u8, u8, u8)) -> (u8, u8, u8) {
    (
        ((r1 as u16 + r2 as u16) / 2) as u8,
        ((g1 as u16 + g2 as u16) / 2) as u8,
        ((b1 as u16 + b2 as u16) / 2) as u8,
    )
}

/// Base color for each standard log level
#[inline]
fn base_rgb(level: Level) -> (u8, u8, u8) {
    match level {
        Level::Error => (255, 0, 0),     // red
        Level::Warn => (255, 255, 0),    // yellow
        Level::Info => (255, 255, 255),  // white
        Level::Debug => (200, 200, 255), // blue
        Level::Trace => (220, 220, 220), // grey
    }
}

pub fn init_log() -> anyhow::Result<()> {
    Builder::new()
        .format(|buf: &mut Formatter, record: &Record| {
            let mut style = buf.style();
            let rgb = match record.target() {
                "success" => blend(base_rgb(record.level()), SUCCESS_TINT),
                _ => base_rgb(record.level()),
            };
            style.set_color(Color::Rgb(rgb.0, rgb.1, rgb.2));

            match record.level() {
                Level::Error | Level::Warn => style.set_bold(true),
                Level::Trace => style.set_dimmed(true),
                _ => style.set_bold(false),
            };

            writeln!(
                buf,
                "[{} {}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                style.value(record.level()),
                style.value(record.args()),
            )
        })
        .filter_level(LevelFilter::Debug)
        .try_init()
        .map_err(Into::into)
}

#[macro_export]
macro_rules! info_success {
    ($($arg:tt)*) => {
        ::log::info!(target: "success", "[SUCCESS] {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! debug_success {
    ($($arg:tt)*) => {
        ::log::debug!(target: "success", "[SUCCESS] {}", format!($($arg)*));
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_tint_shifts_info_toward_green() {
        let tinted = blend(base_rgb(Level::Info), SUCCESS_TINT);
        assert_eq!(tinted, (127, 255, 127));
    }

    #[test]
    fn blend_averages_componentwise_without_overflow() {
        assert_eq!(blend((255, 255, 255), (255, 255, 255)), (255, 255, 255));
        assert_eq!(blend((0, 0, 0), (255, 255, 255)), (127, 127, 127));
    }
}
