use super::{cell_grid::CellGrid, position::Cell};

/// Maximum number of units a layout may place (spawn markers `1`-`4`).
pub const MAX_AGENTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LayoutError {
    #[display("layout is empty")]
    Empty,
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("unknown layout character {ch:?} at ({x}, {y})")]
    UnknownCell { ch: char, x: usize, y: usize },
    #[display("spawn marker {marker} appears more than once")]
    DuplicateSpawn { marker: usize },
    #[display("spawn markers must be 1..=N with N even, found {found:?}")]
    InvalidSpawns { found: Vec<usize> },
}

/// Static description of a maze: walls, initial food and capsules, and spawn cells.
///
/// Layouts are written in ASCII:
///
/// - `%` wall
/// - `.` food
/// - `o` capsule
/// - `1`-`4` spawn cell of unit 0-3
/// - ` ` open floor
///
/// Row 0 is the top row. The left half (`x < width / 2`) belongs to the red team.
///
/// # Example
///
/// ```
/// use capture_engine::{Cell, Layout};
///
/// let layout = Layout::from_ascii(
///     "
///     %%%%%%
///     %1.o2%
///     %%%%%%
///     ",
/// )
/// .unwrap();
/// assert_eq!(layout.width(), 6);
/// assert_eq!(layout.spawn(0), Cell::new(1, 1));
/// assert_eq!(layout.capsules(), [Cell::new(3, 1)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    walls: CellGrid,
    food: CellGrid,
    capsules: Vec<Cell>,
    spawns: Vec<Cell>,
}

impl Layout {
    pub const DEFAULT_CAPTURE: &'static str = include_str!("../../layouts/default_capture.lay");

    /// Parses the built-in capture layout.
    pub fn default_capture() -> Result<Self, LayoutError> {
        Self::from_ascii(Self::DEFAULT_CAPTURE)
    }

    /// Parses an ASCII layout. Surrounding whitespace on each row and blank rows are ignored.
    pub fn from_ascii(art: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = rows.first() else {
            return Err(LayoutError::Empty);
        };
        let width = first.chars().count();
        let height = rows.len();

        let mut walls = CellGrid::new(width, height);
        let mut food = CellGrid::new(width, height);
        let mut capsules = vec![];
        let mut spawns = [None; MAX_AGENTS];

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(LayoutError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = Cell::new(x, y);
                match ch {
                    '%' => {
                        walls.set(cell, true);
                    }
                    '.' => {
                        food.set(cell, true);
                    }
                    'o' => capsules.push(cell),
                    ' ' => {}
                    '1'..='4' => {
                        let marker = ch as usize - '0' as usize;
                        if spawns[marker - 1].replace(cell).is_some() {
                            return Err(LayoutError::DuplicateSpawn { marker });
                        }
                    }
                    _ => return Err(LayoutError::UnknownCell { ch, x, y }),
                }
            }
        }

        let num_agents = spawns.iter().take_while(|s| s.is_some()).count();
        let found: Vec<usize> = (1..=MAX_AGENTS)
            .filter(|marker| spawns[marker - 1].is_some())
            .collect();
        if num_agents == 0 || num_agents % 2 != 0 || found.len() != num_agents {
            return Err(LayoutError::InvalidSpawns { found });
        }
        let spawns = spawns.into_iter().flatten().collect();

        Ok(Self {
            walls,
            food,
            capsules,
            spawns,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.walls.width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.walls.height()
    }

    #[must_use]
    pub fn is_wall(&self, cell: Cell) -> bool {
        cell.x >= self.width() || cell.y >= self.height() || self.walls.get(cell)
    }

    #[must_use]
    pub fn walls(&self) -> &CellGrid {
        &self.walls
    }

    #[must_use]
    pub fn food(&self) -> &CellGrid {
        &self.food
    }

    #[must_use]
    pub fn capsules(&self) -> &[Cell] {
        &self.capsules
    }

    #[must_use]
    pub fn num_agents(&self) -> usize {
        self.spawns.len()
    }

    /// Spawn cell of unit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.num_agents()`.
    #[must_use]
    pub fn spawn(&self, index: usize) -> Cell {
        self.spawns[index]
    }

    /// Whether `cell` lies in the red (left) half.
    #[must_use]
    pub fn is_red_side(&self, cell: Cell) -> bool {
        cell.x < self.width() / 2
    }

    /// Open cells in column-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let (width, height) = (self.width(), self.height());
        (0..width)
            .flat_map(move |x| (0..height).map(move |y| Cell::new(x, y)))
            .filter(|cell| !self.is_wall(*cell))
    }
}
