/// Balance granted when no persisted balance exists (or it cannot be parsed).
pub const DEFAULT_BALANCE: u64 = 10_000;

/// Key under which the balance is persisted as a base-10 integer string.
pub const BALANCE_STORAGE_KEY: &str = "neovegas_coins";

/// Dice rolls are drawn in [0, DICE_ROLL_RANGE) with two decimals.
pub const DICE_ROLL_RANGE: u32 = 100;

/// Lowest and highest selectable dice target.
pub const DICE_MIN_TARGET: u8 = 1;
pub const DICE_MAX_TARGET: u8 = 99;

/// Mines uses a fixed 5x5 grid.
pub const MINES_GRID_SIZE: u8 = 25;

/// Mine count bounds (at least one safe cell must remain).
pub const MINES_MIN_MINES: u8 = 1;
pub const MINES_MAX_MINES: u8 = 24;

/// Dragon Tower always has nine rows.
pub const TOWER_ROWS: u8 = 9;

/// Selectable wheel sizes.
pub const WHEEL_SEGMENT_OPTIONS: [u8; 5] = [20, 25, 30, 35, 40];

/// Hi-Lo ranks run Ace (1) through King (13).
pub const HILO_MIN_RANK: u8 = 1;
pub const HILO_MAX_RANK: u8 = 13;

/// Error codes surfaced to the presentation layer with rejected actions.
pub const ERROR_INVALID_WAGER: u8 = 1;
pub const ERROR_INSUFFICIENT_FUNDS: u8 = 2;
pub const ERROR_INVALID_CONFIG: u8 = 3;
pub const ERROR_NOT_CONFIGURED: u8 = 4;
pub const ERROR_ROUND_ACTIVE: u8 = 5;
pub const ERROR_NO_ACTIVE_ROUND: u8 = 6;
pub const ERROR_STALE_ROUND: u8 = 7;
pub const ERROR_INVALID_MOVE: u8 = 8;
pub const ERROR_NOTHING_TO_CASH_OUT: u8 = 9;
pub const ERROR_DECK_EXHAUSTED: u8 = 10;
