//! CSS3 extended color keywords.
//!
//! Used for the exact-name shortcut: a sample that lands precisely on a
//! named color is reported under that name before any distance matching.

use super::color::Rgb;
use palette::named;

/// Every CSS3 color keyword paired with its `palette` constant, alphabetical.
///
/// Synonyms (`aqua`/`cyan`, `fuchsia`/`magenta`, `gray`/`grey` and the
/// `*gray`/`*grey` pairs) share a value; reverse lookups return the first.
static CSS3_COLORS: &[(&str, Rgb)] = &[
    ("aliceblue", named::ALICEBLUE),
    ("antiquewhite", named::ANTIQUEWHITE),
    ("aqua", named::AQUA),
    ("aquamarine", named::AQUAMARINE),
    ("azure", named::AZURE),
    ("beige", named::BEIGE),
    ("bisque", named::BISQUE),
    ("black", named::BLACK),
    ("blanchedalmond", named::BLANCHEDALMOND),
    ("blue", named::BLUE),
    ("blueviolet", named::BLUEVIOLET),
    ("brown", named::BROWN),
    ("burlywood", named::BURLYWOOD),
    ("cadetblue", named::CADETBLUE),
    ("chartreuse", named::CHARTREUSE),
    ("chocolate", named::CHOCOLATE),
    ("coral", named::CORAL),
    ("cornflowerblue", named::CORNFLOWERBLUE),
    ("cornsilk", named::CORNSILK),
    ("crimson", named::CRIMSON),
    ("cyan", named::CYAN),
    ("darkblue", named::DARKBLUE),
    ("darkcyan", named::DARKCYAN),
    ("darkgoldenrod", named::DARKGOLDENROD),
    ("darkgray", named::DARKGRAY),
    ("darkgreen", named::DARKGREEN),
    ("darkgrey", named::DARKGREY),
    ("darkkhaki", named::DARKKHAKI),
    ("darkmagenta", named::DARKMAGENTA),
    ("darkolivegreen", named::DARKOLIVEGREEN),
    ("darkorange", named::DARKORANGE),
    ("darkorchid", named::DARKORCHID),
    ("darkred", named::DARKRED),
    ("darksalmon", named::DARKSALMON),
    ("darkseagreen", named::DARKSEAGREEN),
    ("darkslateblue", named::DARKSLATEBLUE),
    ("darkslategray", named::DARKSLATEGRAY),
    ("darkslategrey", named::DARKSLATEGREY),
    ("darkturquoise", named::DARKTURQUOISE),
    ("darkviolet", named::DARKVIOLET),
    ("deeppink", named::DEEPPINK),
    ("deepskyblue", named::DEEPSKYBLUE),
    ("dimgray", named::DIMGRAY),
    ("dimgrey", named::DIMGREY),
    ("dodgerblue", named::DODGERBLUE),
    ("firebrick", named::FIREBRICK),
    ("floralwhite", named::FLORALWHITE),
    ("forestgreen", named::FORESTGREEN),
    ("fuchsia", named::FUCHSIA),
    ("gainsboro", named::GAINSBORO),
    ("ghostwhite", named::GHOSTWHITE),
    ("gold", named::GOLD),
    ("goldenrod", named::GOLDENROD),
    ("gray", named::GRAY),
    ("green", named::GREEN),
    ("greenyellow", named::GREENYELLOW),
    ("grey", named::GREY),
    ("honeydew", named::HONEYDEW),
    ("hotpink", named::HOTPINK),
    ("indianred", named::INDIANRED),
    ("indigo", named::INDIGO),
    ("ivory", named::IVORY),
    ("khaki", named::KHAKI),
    ("lavender", named::LAVENDER),
    ("lavenderblush", named::LAVENDERBLUSH),
    ("lawngreen", named::LAWNGREEN),
    ("lemonchiffon", named::LEMONCHIFFON),
    ("lightblue", named::LIGHTBLUE),
    ("lightcoral", named::LIGHTCORAL),
    ("lightcyan", named::LIGHTCYAN),
    ("lightgoldenrodyellow", named::LIGHTGOLDENRODYELLOW),
    ("lightgray", named::LIGHTGRAY),
    ("lightgreen", named::LIGHTGREEN),
    ("lightgrey", named::LIGHTGREY),
    ("lightpink", named::LIGHTPINK),
    ("lightsalmon", named::LIGHTSALMON),
    ("lightseagreen", named::LIGHTSEAGREEN),
    ("lightskyblue", named::LIGHTSKYBLUE),
    ("lightslategray", named::LIGHTSLATEGRAY),
    ("lightslategrey", named::LIGHTSLATEGREY),
    ("lightsteelblue", named::LIGHTSTEELBLUE),
    ("lightyellow", named::LIGHTYELLOW),
    ("lime", named::LIME),
    ("limegreen", named::LIMEGREEN),
    ("linen", named::LINEN),
    ("magenta", named::MAGENTA),
    ("maroon", named::MAROON),
    ("mediumaquamarine", named::MEDIUMAQUAMARINE),
    ("mediumblue", named::MEDIUMBLUE),
    ("mediumorchid", named::MEDIUMORCHID),
    ("mediumpurple", named::MEDIUMPURPLE),
    ("mediumseagreen", named::MEDIUMSEAGREEN),
    ("mediumslateblue", named::MEDIUMSLATEBLUE),
    ("mediumspringgreen", named::MEDIUMSPRINGGREEN),
    ("mediumturquoise", named::MEDIUMTURQUOISE),
    ("mediumvioletred", named::MEDIUMVIOLETRED),
    ("midnightblue", named::MIDNIGHTBLUE),
    ("mintcream", named::MINTCREAM),
    ("mistyrose", named::MISTYROSE),
    ("moccasin", named::MOCCASIN),
    ("navajowhite", named::NAVAJOWHITE),
    ("navy", named::NAVY),
    ("oldlace", named::OLDLACE),
    ("olive", named::OLIVE),
    ("olivedrab", named::OLIVEDRAB),
    ("orange", named::ORANGE),
    ("orangered", named::ORANGERED),
    ("orchid", named::ORCHID),
    ("palegoldenrod", named::PALEGOLDENROD),
    ("palegreen", named::PALEGREEN),
    ("paleturquoise", named::PALETURQUOISE),
    ("palevioletred", named::PALEVIOLETRED),
    ("papayawhip", named::PAPAYAWHIP),
    ("peachpuff", named::PEACHPUFF),
    ("peru", named::PERU),
    ("pink", named::PINK),
    ("plum", named::PLUM),
    ("powderblue", named::POWDERBLUE),
    ("purple", named::PURPLE),
    ("red", named::RED),
    ("rosybrown", named::ROSYBROWN),
    ("royalblue", named::ROYALBLUE),
    ("saddlebrown", named::SADDLEBROWN),
    ("salmon", named::SALMON),
    ("sandybrown", named::SANDYBROWN),
    ("seagreen", named::SEAGREEN),
    ("seashell", named::SEASHELL),
    ("sienna", named::SIENNA),
    ("silver", named::SILVER),
    ("skyblue", named::SKYBLUE),
    ("slateblue", named::SLATEBLUE),
    ("slategray", named::SLATEGRAY),
    ("slategrey", named::SLATEGREY),
    ("snow", named::SNOW),
    ("springgreen", named::SPRINGGREEN),
    ("steelblue", named::STEELBLUE),
    ("tan", named::TAN),
    ("teal", named::TEAL),
    ("thistle", named::THISTLE),
    ("tomato", named::TOMATO),
    ("turquoise", named::TURQUOISE),
    ("violet", named::VIOLET),
    ("wheat", named::WHEAT),
    ("white", named::WHITE),
    ("whitesmoke", named::WHITESMOKE),
    ("yellow", named::YELLOW),
    ("yellowgreen", named::YELLOWGREEN),
];

/// Returns the keyword whose value is exactly `rgb`, if any.
pub fn rgb_to_name(rgb: Rgb) -> Option<&'static str> {
    CSS3_COLORS
        .iter()
        .find(|(_, value)| *value == rgb)
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Color;

    #[test]
    fn test_palette_references_are_named() {
        for color in Color::ALL {
            assert_eq!(rgb_to_name(color.reference_rgb()), Some(color.name()));
        }
    }

    #[test]
    fn test_synonyms_resolve_to_first() {
        assert_eq!(rgb_to_name(named::CYAN), Some("aqua"));
        assert_eq!(rgb_to_name(named::GREY), Some("gray"));
    }

    #[test]
    fn test_unnamed_value() {
        assert_eq!(rgb_to_name(Rgb::new(1, 2, 3)), None);
    }

    #[test]
    fn test_table_covers_keyword_set() {
        assert_eq!(CSS3_COLORS.len(), 147);
        for (name, value) in CSS3_COLORS {
            assert_eq!(named::from_str(name), Some(*value), "{name}");
        }
        assert!(CSS3_COLORS.windows(2).all(|w| w[0].0 < w[1].0));
    }
}
