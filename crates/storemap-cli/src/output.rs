use storemap_core::{GeoCoordinate, ResolvedStore, ViewportRect};

const NAME_WIDTH: usize = 28;
const CATEGORY_WIDTH: usize = 16;

pub(crate) fn print_stores(stores: &[&ResolvedStore]) {
    if stores.is_empty() {
        println!("no matching stores");
        return;
    }

    let header = format!(
        "{:<name$}{:<category$}{:<22}ADDRESS",
        "NAME",
        "CATEGORY",
        "LOCATION",
        name = NAME_WIDTH,
        category = CATEGORY_WIDTH,
    );
    println!("{header}");
    for store in stores {
        println!(
            "{:<name$}{:<category$}{:<22}{}",
            truncate(store.name(), NAME_WIDTH - 2),
            truncate(store.category(), CATEGORY_WIDTH - 2),
            fmt_coordinate(store.coordinate),
            store.address(),
            name = NAME_WIDTH,
            category = CATEGORY_WIDTH,
        );
    }
    println!();
    println!("{} store(s)", stores.len());
}

pub(crate) fn fmt_coordinate(coordinate: GeoCoordinate) -> String {
    format!("{:.6}, {:.6}", coordinate.lat, coordinate.lng)
}

pub(crate) fn fmt_bounds(bounds: &ViewportRect) -> String {
    format!(
        "N {:.6} S {:.6} E {:.6} W {:.6}",
        bounds.north(),
        bounds.south(),
        bounds.east(),
        bounds.west()
    )
}

/// Cuts `text` to at most `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Bakery", 10), "Bakery");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("용인시청앞베이커리", 6), "용인시...");
    }

    #[test]
    fn coordinate_uses_six_decimals() {
        assert_eq!(
            fmt_coordinate(GeoCoordinate::new(37.2415, 127.1775)),
            "37.241500, 127.177500"
        );
    }

    #[test]
    fn bounds_lists_edges_north_first() {
        let bounds = ViewportRect::from_edges(38.0, 37.0, 128.0, 127.0);
        assert_eq!(
            fmt_bounds(&bounds),
            "N 38.000000 S 37.000000 E 128.000000 W 127.000000"
        );
    }
}
