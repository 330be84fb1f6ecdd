//! Skill point budget per character level.

pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 90;

/// Free points granted at level 1 so a new character can place one point.
pub const STARTER_SKILL_POINTS: u32 = 1;

/// Cumulative skill points per character level, indexed by `level - 1`.
/// The jumps (8 → 11 at level 10, 56 → 60 at level 50, ...) are the game's
/// own progression, not a formula.
const LEVEL_POINTS: [u32; MAX_LEVEL as usize] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 11, //
    12, 13, 14, 15, 16, 17, 18, 19, 20, 23, //
    24, 25, 26, 27, 28, 29, 30, 31, 32, 35, //
    36, 37, 38, 39, 40, 41, 42, 43, 44, 47, //
    48, 49, 50, 51, 52, 53, 54, 55, 56, 60, //
    61, 62, 63, 64, 65, 66, 67, 68, 69, 73, //
    74, 75, 76, 77, 78, 79, 80, 81, 82, 85, //
    86, 87, 88, 89, 90, 91, 92, 93, 94, 97, //
    98, 99, 100, 101, 102, 103, 104, 105, 106, 109,
];

pub fn clamp_level(level: i64) -> u32 {
    level.clamp(MIN_LEVEL as i64, MAX_LEVEL as i64) as u32
}

/// Reads a level typed by the user. Leading digits are honoured the way a
/// number input reports them; anything unreadable falls back to level 1.
pub fn parse_level(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits: String = digits.chars().take_while(char::is_ascii_digit).collect();
    match digits.parse::<i64>() {
        Ok(value) if negative => clamp_level(-value),
        Ok(value) => clamp_level(value),
        // Longer than i64 but still all digits: past the cap either way.
        Err(_) if !digits.is_empty() && !negative => MAX_LEVEL,
        Err(_) => MIN_LEVEL,
    }
}

/// Total skill points available at `level`, after clamping into range.
pub fn skill_points_cap(level: u32) -> u32 {
    let level = clamp_level(level as i64);
    let base = LEVEL_POINTS[(level - 1) as usize];
    if level == MIN_LEVEL {
        base + STARTER_SKILL_POINTS
    } else {
        base
    }
}
