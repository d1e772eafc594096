/// Column and table name constants shared by the pipeline stages and the CLI.

// Input columns
pub const ID_COLUMN: &str = "id";
pub const CATEGORIES_COLUMN: &str = "categories";

// Category encoding: `name-value` tokens separated by `;`
pub const DEFAULT_CATEGORY_DELIMITER: char = ';';
/// Characters stripped from the end of a token to get its name (`-` and the digit).
pub const CATEGORY_SUFFIX_LEN: usize = 2;

// Label column whose out-of-range values are normalized
pub const DEFAULT_BINARY_COLUMN: &str = "related";

// Output
pub const DEFAULT_TABLE_NAME: &str = "DisasterResponse";

// Suffixes for non-key columns present in both join inputs
pub const LEFT_SUFFIX: &str = "_x";
pub const RIGHT_SUFFIX: &str = "_y";

pub const DEFAULT_LOG_DIRECTIVE: &str = "disaster_etl=info";
pub const LOG_FILE_NAME: &str = "disaster_etl.log";

pub const USAGE: &str = "Please provide the filepaths of the messages and categories \
datasets as the first and second argument respectively, as \
well as the filepath of the database to save the cleaned data \
to as the third argument. \n\nExample: disaster_etl \
disaster_messages.csv disaster_categories.csv \
DisasterResponse.db";
