use crate::tuple::{Column, DataType};

use super::Statement;

/// Parses one text command into a [`Statement`].
///
/// The grammar is deliberately small: `CREATE TABLE t (col type, ...)`,
/// `INSERT INTO t VALUES (v, ...)`, `SELECT * FROM t`, `SELECT * FROM t
/// WHERE col = v` and `DELETE FROM t WHERE col = v`, keywords
/// case-insensitive, with an optional trailing semicolon. Returns None
/// when the input matches no command shape.
pub fn parse(input: &str) -> Option<Statement> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();

    parse_create_table(trimmed)
        .or_else(|| parse_insert(trimmed))
        .or_else(|| parse_select(trimmed))
        .or_else(|| parse_delete(trimmed))
}

fn parse_create_table(input: &str) -> Option<Statement> {
    let rest = strip_keyword(input, "CREATE")?;
    let rest = strip_keyword(rest, "TABLE")?;
    let (table, rest) = take_word(rest)?;

    let defs = unwrap_parens(rest.trim_start())?;
    let mut columns = Vec::new();
    for def in defs.split(',') {
        let (name, type_text) = def.trim().split_once(' ')?;
        let data_type = DataType::parse(type_text)?;
        columns.push(Column::new(name, data_type));
    }

    Some(Statement::CreateTable {
        table: table.to_string(),
        columns,
    })
}

fn parse_insert(input: &str) -> Option<Statement> {
    let rest = strip_keyword(input, "INSERT")?;
    let rest = strip_keyword(rest, "INTO")?;
    let (table, rest) = take_word(rest)?;
    let rest = strip_keyword(rest, "VALUES")?;

    let literals = unwrap_parens(rest)?;
    let values = literals
        .split(',')
        .map(|lit| unquote(lit.trim()).to_string())
        .collect();

    Some(Statement::Insert {
        table: table.to_string(),
        values,
    })
}

fn parse_select(input: &str) -> Option<Statement> {
    let rest = strip_keyword(input, "SELECT")?;
    let rest = rest.strip_prefix('*')?.trim_start();
    let rest = strip_keyword(rest, "FROM")?;
    let (table, rest) = take_word(rest)?;

    if rest.trim().is_empty() {
        return Some(Statement::SelectAll {
            table: table.to_string(),
        });
    }

    let key = parse_key_condition(rest)?;
    Some(Statement::SelectByKey {
        table: table.to_string(),
        key,
    })
}

fn parse_delete(input: &str) -> Option<Statement> {
    let rest = strip_keyword(input, "DELETE")?;
    let rest = strip_keyword(rest, "FROM")?;
    let (table, rest) = take_word(rest)?;

    let key = parse_key_condition(rest)?;
    Some(Statement::DeleteByKey {
        table: table.to_string(),
        key,
    })
}

/// Parses a `WHERE col = literal` tail. The column name is validated but
/// otherwise ignored: lookups always go through the key index.
fn parse_key_condition(rest: &str) -> Option<String> {
    let rest = strip_keyword(rest, "WHERE")?;
    let (_column, rest) = take_word(rest)?;
    let rest = rest.trim_start().strip_prefix('=')?;

    let token = rest.trim();
    let literal = unquote(token);
    if literal.is_empty() || !literal.chars().all(is_word_char) {
        return None;
    }
    Some(literal.to_string())
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Strips a leading keyword, case-insensitively. The keyword must end at a
/// word boundary; the remainder is returned with leading whitespace removed.
fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let input = input.trim_start();
    if input.len() < keyword.len() {
        return None;
    }
    let (head, rest) = input.split_at(keyword.len());
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    if rest.chars().next().is_some_and(is_word_char) {
        return None;
    }
    Some(rest.trim_start())
}

/// Takes a leading identifier or number, returning it and the remainder.
fn take_word(input: &str) -> Option<(&str, &str)> {
    let end = input
        .find(|c: char| !is_word_char(c))
        .unwrap_or(input.len());
    if end == 0 {
        return None;
    }
    Some((&input[..end], &input[end..]))
}

/// Unwraps a parenthesized payload that must close at the end of the input.
fn unwrap_parens(input: &str) -> Option<&str> {
    let inner = input.strip_prefix('(')?.strip_suffix(')')?;
    if inner.trim().is_empty() {
        return None;
    }
    Some(inner)
}

/// Strips one pair of wrapping single quotes, if present.
fn unquote(literal: &str) -> &str {
    literal
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(literal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_table() {
        let stmt = parse("CREATE TABLE t (id int, name char(8));").unwrap();
        match stmt {
            Statement::CreateTable { table, columns } => {
                assert_eq!(table, "t");
                assert_eq!(columns.len(), 2);
                assert_eq!(columns[0].name(), "id");
                assert_eq!(*columns[0].data_type(), DataType::Integer);
                assert_eq!(columns[1].name(), "name");
                assert_eq!(*columns[1].data_type(), DataType::Char(8));
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_parse_create_table_bad_type() {
        assert_eq!(parse("CREATE TABLE t (id float)"), None);
        assert_eq!(parse("CREATE TABLE t (id)"), None);
        assert_eq!(parse("CREATE TABLE t ()"), None);
    }

    #[test]
    fn test_parse_insert() {
        let stmt = parse("INSERT INTO t VALUES (1, 'alice');").unwrap();
        assert_eq!(
            stmt,
            Statement::Insert {
                table: "t".to_string(),
                values: vec!["1".to_string(), "alice".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_insert_unquoted_values() {
        let stmt = parse("insert into t values(42, bob)").unwrap();
        assert_eq!(
            stmt,
            Statement::Insert {
                table: "t".to_string(),
                values: vec!["42".to_string(), "bob".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_select_all() {
        assert_eq!(
            parse("SELECT * FROM t"),
            Some(Statement::SelectAll {
                table: "t".to_string()
            })
        );
        assert_eq!(
            parse("select * from users;"),
            Some(Statement::SelectAll {
                table: "users".to_string()
            })
        );
    }

    #[test]
    fn test_parse_select_by_key() {
        assert_eq!(
            parse("SELECT * FROM t WHERE id = 2;"),
            Some(Statement::SelectByKey {
                table: "t".to_string(),
                key: "2".to_string()
            })
        );
        assert_eq!(
            parse("select * from t where id='7'"),
            Some(Statement::SelectByKey {
                table: "t".to_string(),
                key: "7".to_string()
            })
        );
    }

    #[test]
    fn test_parse_delete() {
        assert_eq!(
            parse("DELETE FROM t WHERE id = 1;"),
            Some(Statement::DeleteByKey {
                table: "t".to_string(),
                key: "1".to_string()
            })
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("DROP TABLE t"), None);
        assert_eq!(parse("SELECT * FROM"), None);
        assert_eq!(parse("SELECT * FROM t extra"), None);
        assert_eq!(parse("INSERT INTO t VALUES"), None);
        assert_eq!(parse("DELETE FROM t"), None);
        assert_eq!(parse("DELETE FROM t WHERE id ="), None);
    }

    #[test]
    fn test_parse_rejects_unbalanced_quote() {
        assert_eq!(parse("SELECT * FROM t WHERE id = 'abc"), None);
    }

    #[test]
    fn test_keywords_need_boundaries() {
        assert_eq!(parse("CREATETABLE t (id int)"), None);
        assert_eq!(parse("INSERT INTOt VALUES (1)"), None);
    }
}
