//! Data types, column lists and names.

use super::{child, BuildError};
use crate::ast::{
    DataType, FunctionIdentifier, StructField, StructType, TableIdentifier, MAX_DECIMAL_PRECISION,
};
use crate::lexer::{Keyword, TokenKind};
use crate::parser::{Rule, RuleNode};

/// Returns the text of an `identifier` node.
pub fn identifier(node: &RuleNode) -> Result<String, BuildError> {
    node.first_token()
        .map(|token| token.text.clone())
        .ok_or(BuildError::Malformed {
            parent: node.rule,
            missing: "identifier token",
        })
}

/// Returns the `identifier` children of `node`, in order.
pub fn identifiers(node: &RuleNode) -> Result<Vec<String>, BuildError> {
    node.rules_of(Rule::Identifier).map(identifier).collect()
}

/// Returns the alias of a `tableAlias` node, if one was given.
pub fn alias(node: &RuleNode) -> Result<Option<String>, BuildError> {
    node.rule_of(Rule::Identifier).map(identifier).transpose()
}

/// Splits a `(db.)?name` node into its parts.
fn two_part_name(node: &RuleNode) -> Result<(Option<String>, String), BuildError> {
    let mut parts = identifiers(node)?;
    let name = parts.pop().ok_or(BuildError::Malformed {
        parent: node.rule,
        missing: "name",
    })?;
    Ok((parts.pop(), name))
}

pub fn table_identifier(node: &RuleNode) -> Result<TableIdentifier, BuildError> {
    let (database, table) = two_part_name(node)?;
    Ok(TableIdentifier { database, table })
}

pub fn function_identifier(node: &RuleNode) -> Result<FunctionIdentifier, BuildError> {
    let (database, name) = two_part_name(node)?;
    Ok(FunctionIdentifier { database, name })
}

/// Returns the data type child of `node`.
pub fn data_type_child(node: &RuleNode) -> Result<&RuleNode, BuildError> {
    node.rules()
        .find(|n| matches!(n.rule, Rule::PrimitiveDataType | Rule::ComplexDataType))
        .ok_or(BuildError::Malformed {
            parent: node.rule,
            missing: "data type",
        })
}

pub fn data_type(node: &RuleNode) -> Result<DataType, BuildError> {
    match node.rule {
        Rule::ComplexDataType => complex_data_type(node),
        _ => primitive_data_type(node),
    }
}

fn complex_data_type(node: &RuleNode) -> Result<DataType, BuildError> {
    let element_types = || {
        node.rules()
            .filter(|n| matches!(n.rule, Rule::PrimitiveDataType | Rule::ComplexDataType))
            .map(data_type)
            .collect::<Result<Vec<_>, _>>()
    };
    let keyword = node.first_token().and_then(|token| token.as_keyword());
    match keyword {
        Some(Keyword::Array) => {
            let mut types = element_types()?;
            types
                .pop()
                .map(|element| DataType::Array(Box::new(element)))
                .ok_or_else(|| malformed(node))
        }
        Some(Keyword::Map) => <[DataType; 2]>::try_from(element_types()?)
            .map(|[key, value]| DataType::Map(Box::new(key), Box::new(value)))
            .map_err(|_| malformed(node)),
        Some(Keyword::Struct) => {
            let fields = match node.rule_of(Rule::ComplexColTypeList) {
                Some(list) => list
                    .rules_of(Rule::ComplexColType)
                    .map(field)
                    .collect::<Result<Vec<_>, _>>()?,
                None => Vec::new(),
            };
            Ok(DataType::Struct(StructType::new(fields)))
        }
        _ => Err(malformed(node)),
    }
}

const fn malformed(node: &RuleNode) -> BuildError {
    BuildError::Malformed {
        parent: node.rule,
        missing: "type parameters",
    }
}

fn primitive_data_type(node: &RuleNode) -> Result<DataType, BuildError> {
    let name = identifier(child(node, Rule::Identifier)?)?.to_lowercase();
    // Lengths too large for u64 saturate; every consumer rejects them anyway.
    let params: Vec<u64> = node
        .tokens()
        .filter(|token| token.kind == TokenKind::Integer)
        .map(|token| token.text.parse().unwrap_or(u64::MAX))
        .collect();

    let unsupported = || {
        let shown = if params.is_empty() {
            name.clone()
        } else {
            let list: Vec<String> = params.iter().map(ToString::to_string).collect();
            format!("{name}({})", list.join(","))
        };
        BuildError::at(format!("DataType {shown} is not supported."), node)
    };
    let length = |n: u64| u32::try_from(n).map_err(|_| unsupported());

    let data_type = match (name.as_str(), params.as_slice()) {
        ("boolean", []) => DataType::Boolean,
        ("tinyint" | "byte", []) => DataType::Byte,
        ("smallint" | "short", []) => DataType::Short,
        ("int" | "integer", []) => DataType::Integer,
        ("bigint" | "long", []) => DataType::Long,
        ("float", []) => DataType::Float,
        ("double", []) => DataType::Double,
        ("date", []) => DataType::Date,
        ("timestamp", []) => DataType::Timestamp,
        ("string", []) => DataType::String,
        ("binary", []) => DataType::Binary,
        ("char", &[n]) => DataType::Char(length(n)?),
        ("varchar", &[n]) => DataType::Varchar(length(n)?),
        ("decimal", []) => DataType::DEFAULT_DECIMAL,
        ("decimal", &[precision]) => decimal(precision, 0)?,
        ("decimal", &[precision, scale]) => decimal(precision, scale)?,
        _ => return Err(unsupported()),
    };
    Ok(data_type)
}

fn decimal(precision: u64, scale: u64) -> Result<DataType, BuildError> {
    let too_precise = || BuildError::DecimalPrecision {
        precision,
        max: MAX_DECIMAL_PRECISION,
    };
    let too_wide = || BuildError::DecimalScale { precision, scale };
    let declared = u8::try_from(precision).map_err(|_| too_precise())?;
    if declared > MAX_DECIMAL_PRECISION {
        return Err(too_precise());
    }
    if scale > precision {
        return Err(too_wide());
    }
    Ok(DataType::Decimal {
        precision: declared,
        scale: u8::try_from(scale).map_err(|_| too_wide())?,
    })
}

/// Builds a `colType` or `complexColType` node.
fn field(node: &RuleNode) -> Result<StructField, BuildError> {
    let name = identifier(child(node, Rule::Identifier)?)?;
    let mut field = StructField::new(name, data_type(data_type_child(node)?)?);
    field.nullable = !node.has_keyword(Keyword::Not);
    field.comment = node
        .token_of(TokenKind::String)
        .map(|token| super::expression::unescape_string(&token.text));
    Ok(field)
}

pub fn col_type_list(node: &RuleNode) -> Result<StructType, BuildError> {
    let fields = node
        .rules_of(Rule::ColType)
        .map(field)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(StructType::new(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_bounds() {
        assert_eq!(
            decimal(38, 38).unwrap(),
            DataType::Decimal {
                precision: 38,
                scale: 38
            }
        );
        assert!(matches!(
            decimal(39, 0),
            Err(BuildError::DecimalPrecision { precision: 39, .. })
        ));
        assert!(matches!(
            decimal(5, 6),
            Err(BuildError::DecimalScale {
                precision: 5,
                scale: 6
            })
        ));
    }
}
