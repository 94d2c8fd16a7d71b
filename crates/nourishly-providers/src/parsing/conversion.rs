// ABOUTME: Estimates the weight in grams of a parsed ingredient quantity
// ABOUTME: Mass units convert directly; volume and count units go through a density table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

/// Density of one ingredient family
#[derive(Debug, Clone, Copy)]
struct Density {
    /// Names matched as substrings of the ingredient name, most specific first
    names: &'static [&'static str],
    grams_per_ml: Option<f64>,
    grams_per_piece: Option<f64>,
}

const fn volume(names: &'static [&'static str], grams_per_ml: f64) -> Density {
    Density {
        names,
        grams_per_ml: Some(grams_per_ml),
        grams_per_piece: None,
    }
}

const fn pieces(names: &'static [&'static str], grams_per_piece: f64) -> Density {
    Density {
        names,
        grams_per_ml: None,
        grams_per_piece: Some(grams_per_piece),
    }
}

const fn both(names: &'static [&'static str], grams_per_ml: f64, grams_per_piece: f64) -> Density {
    Density {
        names,
        grams_per_ml: Some(grams_per_ml),
        grams_per_piece: Some(grams_per_piece),
    }
}

const ML_PER_CUP: f64 = 240.0;
const ML_PER_TBSP: f64 = 15.0;
const ML_PER_TSP: f64 = 5.0;
const ML_PER_PINT: f64 = 473.0;
const ML_PER_QUART: f64 = 946.0;
const ML_PER_GALLON: f64 = 3785.0;
const ML_PER_LITER: f64 = 1000.0;

const GRAMS_PER_OZ: f64 = 28.35;
const GRAMS_PER_LB: f64 = 453.6;
const GRAMS_PER_KG: f64 = 1000.0;

// Approximate averages; order matters because the first substring match wins.
const DENSITIES: &[Density] = &[
    volume(&["brown sugar"], 0.93),
    volume(&["powdered sugar", "icing sugar"], 0.56),
    volume(&["sugar"], 0.85),
    volume(&["whole wheat flour"], 0.51),
    volume(&["flour"], 0.50),
    volume(&["cooked rice"], 0.72),
    volume(&["rice"], 0.77),
    volume(&["oats", "oatmeal"], 0.36),
    volume(&["quinoa"], 0.71),
    volume(&["pasta", "macaroni", "noodles"], 0.45),
    volume(&["peanut butter"], 1.08),
    volume(&["butter"], 0.96),
    volume(&["olive oil", "vegetable oil", "oil"], 0.92),
    volume(&["honey", "maple syrup", "syrup"], 1.42),
    volume(&["milk", "cream"], 1.03),
    volume(&["yogurt"], 1.05),
    volume(&["broth", "stock", "water"], 1.0),
    volume(&["salt"], 1.2),
    volume(&["cheese"], 0.45),
    volume(&["beans", "lentils", "chickpeas"], 0.75),
    volume(&["spinach"], 0.13),
    volume(&["chicken", "beef", "pork", "turkey"], 0.55),
    both(&["egg white"], 1.03, 33.0),
    pieces(&["egg"], 50.0),
    pieces(&["garlic"], 3.0),
    pieces(&["onion"], 110.0),
    pieces(&["potato"], 170.0),
    pieces(&["tomato"], 120.0),
    pieces(&["carrot"], 60.0),
    pieces(&["banana"], 120.0),
    pieces(&["apple"], 180.0),
    pieces(&["lemon", "lime"], 60.0),
    pieces(&["bell pepper"], 120.0),
    pieces(&["tortilla"], 45.0),
    pieces(&["bread"], 30.0),
];

fn lookup(name: &str) -> Option<&'static Density> {
    let name = name.to_lowercase();
    DENSITIES
        .iter()
        .find(|d| d.names.iter().any(|candidate| name.contains(candidate)))
}

fn mass_factor(unit: &str) -> Option<f64> {
    match unit {
        "g" | "gram" | "grams" => Some(1.0),
        "kg" | "kilogram" | "kilograms" => Some(GRAMS_PER_KG),
        "oz" | "ounce" | "ounces" => Some(GRAMS_PER_OZ),
        "lb" | "lbs" | "pound" | "pounds" => Some(GRAMS_PER_LB),
        _ => None,
    }
}

fn volume_ml(unit: &str) -> Option<f64> {
    match unit {
        "c" | "cup" | "cups" => Some(ML_PER_CUP),
        "tbsp" | "tablespoon" | "tablespoons" => Some(ML_PER_TBSP),
        "tsp" | "teaspoon" | "teaspoons" => Some(ML_PER_TSP),
        "pinch" | "dash" => Some(ML_PER_TSP / 8.0),
        "pint" | "pints" => Some(ML_PER_PINT),
        "quart" | "quarts" => Some(ML_PER_QUART),
        "gallon" | "gallons" => Some(ML_PER_GALLON),
        "ml" | "milliliter" | "milliliters" => Some(1.0),
        "l" | "liter" | "liters" | "litre" | "litres" => Some(ML_PER_LITER),
        _ => None,
    }
}

/// Estimate the weight of `quantity` `unit` of `name` in grams
///
/// Mass units always convert. Volume units need a known density, and a
/// missing unit or a count unit (`clove`, `slice`) needs a known piece weight.
/// Returns `None` when no estimate is possible.
#[must_use]
pub fn estimate_grams(quantity: f64, unit: Option<&str>, name: &str) -> Option<f64> {
    if !quantity.is_finite() || quantity < 0.0 {
        return None;
    }

    let unit = unit.map(str::to_lowercase);
    if let Some(factor) = unit.as_deref().and_then(mass_factor) {
        return Some(quantity * factor);
    }

    let density = lookup(name)?;
    match unit.as_deref().and_then(volume_ml) {
        Some(ml) => density.grams_per_ml.map(|g| quantity * ml * g),
        None => density.grams_per_piece.map(|g| quantity * g),
    }
}
