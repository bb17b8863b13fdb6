// Built-in sample catalog
// Default base sequence, and the fallback when a provider fails.

use crate::product::{parse_added_date, PerfumeType, Product};

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    name: &str,
    brand: &str,
    price: f64,
    presentation: &str,
    occasion: &str,
    climate: &str,
    time_of_day: &str,
    gender: &str,
    perfume_type: PerfumeType,
    image_url: &str,
    added_date: &str,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        brand: brand.to_string(),
        price,
        presentation: presentation.to_string(),
        occasion: occasion.to_string(),
        climate: climate.to_string(),
        time_of_day: time_of_day.to_string(),
        gender: gender.to_string(),
        perfume_type,
        image_url: image_url.to_string(),
        added_date: added_date.to_string(),
        added_at: parse_added_date(added_date),
    }
}

pub fn sample_products() -> Vec<Product> {
    use PerfumeType::*;

    vec![
        sample(
            "1",
            "Oud Royale",
            "Maison Luxe",
            250.0,
            "100ml",
            "noche",
            "frio",
            "noche",
            "unisex",
            Arabe,
            "/luxury-oud-perfume-bottle.jpg",
            "2024-01-15",
        ),
        sample(
            "2",
            "Fleur de Printemps",
            "Élégance Paris",
            180.0,
            "50ml",
            "dia",
            "templado",
            "dia",
            "mujer",
            Disenador,
            "/floral-perfume-bottle-pink.jpg",
            "2024-02-20",
        ),
        sample(
            "3",
            "Amber Noir",
            "Niche Artisan",
            320.0,
            "75ml",
            "noche",
            "frio",
            "noche",
            "hombre",
            Nicho,
            "/amber-noir-perfume-bottle.jpg",
            "2024-01-10",
        ),
        sample(
            "4",
            "Citrus Breeze",
            "Fresh & Co",
            95.0,
            "100ml",
            "casual",
            "calido",
            "dia",
            "unisex",
            Disenador,
            "/citrus-fresh-perfume-bottle.jpg",
            "2024-03-05",
        ),
        sample(
            "5",
            "Rose Mystique",
            "Atelier de Parfum",
            280.0,
            "50ml",
            "formal",
            "templado",
            "tarde",
            "mujer",
            Nicho,
            "/rose-mystique-perfume-bottle.jpg",
            "2024-02-01",
        ),
        sample(
            "6",
            "Leather & Spice",
            "Heritage House",
            210.0,
            "100ml",
            "casual",
            "frio",
            "tarde",
            "hombre",
            Disenador,
            "/leather-spice-perfume-bottle.jpg",
            "2024-01-25",
        ),
        sample(
            "7",
            "Jasmine Dreams",
            "Oriental Essence",
            195.0,
            "75ml",
            "noche",
            "calido",
            "noche",
            "mujer",
            Arabe,
            "/jasmine-oriental-perfume-bottle.jpg",
            "2024-02-15",
        ),
        sample(
            "8",
            "Aqua Marine",
            "Ocean Blue",
            120.0,
            "100ml",
            "dia",
            "calido",
            "dia",
            "hombre",
            Disenador,
            "/aqua-marine-perfume-bottle.jpg",
            "2024-03-10",
        ),
    ]
}
