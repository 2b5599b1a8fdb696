/// Side length of the board.
pub const BOARD_SIZE: usize = 3;
/// Number of squares on the board.
pub const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// Every line that wins the game when filled by one player: three rows,
/// three columns and both diagonals.
pub const WIN_LINES: [[(usize, usize); BOARD_SIZE]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Address the server listens on unless told otherwise.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
/// Address the client connects to unless told otherwise.
pub const DEFAULT_CONNECT_ADDR: &str = "127.0.0.1:8080";

/// Environment variable holding the log level.
pub const LOG_ENV_VAR: &str = "TTT_LOG";
