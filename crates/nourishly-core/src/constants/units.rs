// ABOUTME: Unit vocabularies for ingredient line parsing
// ABOUTME: Recognized measure names and unicode fraction values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly

/// Measures recognized as the word following an ingredient quantity
pub const COMMON_UNITS: &[&str] = &[
    "tablespoons",
    "tablespoon",
    "teaspoons",
    "teaspoon",
    "kilograms",
    "kilogram",
    "pounds",
    "pound",
    "ounces",
    "ounce",
    "grams",
    "gram",
    "cups",
    "cup",
    "pints",
    "pint",
    "quarts",
    "quart",
    "gallons",
    "gallon",
    "liters",
    "liter",
    "litres",
    "litre",
    "milliliters",
    "milliliter",
    "cloves",
    "clove",
    "slices",
    "slice",
    "pieces",
    "piece",
    "cans",
    "can",
    "packages",
    "package",
    "pinch",
    "dash",
    "bunch",
    "sprigs",
    "sprig",
    "stalks",
    "stalk",
    "heads",
    "head",
    "tbsp",
    "tsp",
    "lbs",
    "lb",
    "oz",
    "kg",
    "ml",
    "g",
    "l",
    "c",
];

/// Unicode vulgar fractions and their values
pub const UNICODE_FRACTIONS: &[(char, f64)] = &[
    ('¼', 0.25),
    ('½', 0.5),
    ('¾', 0.75),
    ('⅐', 1.0 / 7.0),
    ('⅑', 1.0 / 9.0),
    ('⅒', 0.1),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('⅕', 0.2),
    ('⅖', 0.4),
    ('⅗', 0.6),
    ('⅘', 0.8),
    ('⅙', 1.0 / 6.0),
    ('⅚', 5.0 / 6.0),
    ('⅛', 0.125),
    ('⅜', 0.375),
    ('⅝', 0.625),
    ('⅞', 0.875),
];
