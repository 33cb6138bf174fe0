//! Built-in lines used when generating offline

use app_platform::RandomSource;

/// Category used when the requested one has no built-in lines
pub const DEFAULT_FALLBACK_CATEGORY: &str = "funny";

const FALLBACK_LINES: &[(&str, &[&str])] = &[
    (
        "funny",
        &[
            "Are you a parking ticket? Because you've got FINE written all over you.",
            "Do you have a name, or can I call you mine? Just kidding, I'd need your number first.",
            "I'm not a photographer, but I can definitely picture us together.",
        ],
    ),
    (
        "cheesy",
        &[
            "Are you made of copper and tellurium? Because you're Cu-Te.",
            "Do you have a map? I keep getting lost in your eyes.",
            "If you were a vegetable, you'd be a cute-cumber.",
        ],
    ),
    (
        "clever",
        &[
            "Are you a time traveler? Because I see you in my future.",
            "I'm not a mathematician, but I'm pretty good with numbers. For instance, I know yours is missing from my phone.",
            "Are you French? Because Eiffel for you.",
        ],
    ),
    (
        "sweet",
        &[
            "I must be a snowflake, because I've fallen for you.",
            "I'd never play hide and seek with you because someone like you is impossible to find.",
            "Your smile is like Expelliarmus. Simple but disarming.",
        ],
    ),
    (
        "nerdy",
        &[
            "According to the second law of thermodynamics, you're supposed to share your hotness with me.",
            "Are you made of beryllium, gold, and titanium? Because you are BeAuTi-ful.",
            "If you were a triangle, you'd be acute one.",
        ],
    ),
    (
        "smooth",
        &[
            "I must be in a museum, because you truly are a work of art.",
            "If beauty were time, you'd be an eternity.",
            "I'd say God bless you, but it looks like he already did.",
        ],
    ),
];

/// Built-in lines for `category`, if it has any
pub fn lines_for(category: &str) -> Option<&'static [&'static str]> {
    FALLBACK_LINES.iter().find(|(id, _)| *id == category).map(|(_, lines)| *lines)
}

/// Built-in lines for `category`, or the default category's lines
pub fn lines_or_default(category: &str) -> &'static [&'static str] {
    lines_for(category)
        .or_else(|| lines_for(DEFAULT_FALLBACK_CATEGORY))
        .unwrap_or(&[])
}

/// Pick a built-in line for `category`
pub fn pick(category: &str, rng: &mut dyn RandomSource) -> &'static str {
    let lines = lines_or_default(category);
    let upper = u32::try_from(lines.len()).unwrap_or(u32::MAX);
    lines.get(rng.next_below(upper) as usize).copied().unwrap_or_default()
}
