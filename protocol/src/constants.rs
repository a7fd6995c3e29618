//! 协议常量定义

/// 井字棋棋盘边长
pub const TICTACTOE_SIZE: usize = 3;

/// 黑白棋棋盘边长
pub const OTHELLO_SIZE: usize = 8;

/// 主场方棋子字符
pub const HOME_MARK_CHAR: char = 'X';

/// 客场方棋子字符
pub const AWAY_MARK_CHAR: char = 'O';

/// 空格字符（棋盘文本图）
pub const EMPTY_CHAR: char = '.';

/// 井字棋未接入对局时返回的默认走法
pub const TICTACTOE_UNATTACHED_TOKEN: &str = "0";

/// 黑白棋未接入对局时返回的默认走法
pub const OTHELLO_UNATTACHED_TOKEN: &str = "0a";

/// 开局阶段随机走棋的默认步数
pub const DEFAULT_OPENING_MOVES: u32 = 2;

/// 搜索的默认深度上限
pub const DEFAULT_MAX_DEPTH: u32 = 7;
