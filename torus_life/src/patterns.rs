// patterns.rs - Named seed configurations

/// A pattern drawn as text rows, `O` for a live cell and `.` for a dead one.
pub struct Pattern {
    pub name: &'static str,
    pub rows: &'static [&'static str],
}

impl Pattern {
    pub fn width(&self) -> usize {
        self.rows.iter().map(|row| row.len()).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Offsets of the live cells relative to the pattern's top-left corner.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'O')
                .map(move |(x, _)| (x, y))
        })
    }
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Glider",
        rows: &[".O.", "..O", "OOO"],
    },
    Pattern {
        name: "Blinker",
        rows: &["OOO"],
    },
    Pattern {
        name: "Block",
        rows: &["OO", "OO"],
    },
    Pattern {
        name: "Toad",
        rows: &[".OOO", "OOO."],
    },
    Pattern {
        name: "Beacon",
        rows: &["OO..", "OO..", "..OO", "..OO"],
    },
    Pattern {
        name: "Pulsar",
        rows: &[
            "..OOO...OOO..",
            ".............",
            "O....O.O....O",
            "O....O.O....O",
            "O....O.O....O",
            "..OOO...OOO..",
            ".............",
            "..OOO...OOO..",
            "O....O.O....O",
            "O....O.O....O",
            "O....O.O....O",
            ".............",
            "..OOO...OOO..",
        ],
    },
    Pattern {
        name: "R-pentomino",
        rows: &[".OO", "OO.", ".O."],
    },
    Pattern {
        name: "Gosper Glider Gun",
        rows: &[
            "........................O...........",
            "......................O.O...........",
            "............OO......OO............OO",
            "...........O...O....OO............OO",
            "OO........O.....O...OO..............",
            "OO........O...O.OO....O.O...........",
            "..........O.....O.......O...........",
            "...........O...O....................",
            "............OO......................",
        ],
    },
];

pub fn find(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
