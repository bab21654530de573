//! Grammar rules for statements, queries, relations, types and names.

use super::prediction::{Abort, Decision, PResult};
use super::recognizer::{Alternative, Parser};
use super::tree::{Rule, RuleNode};
use crate::lexer::{CharStream, Keyword, TokenKind};

impl<S: CharStream> Parser<S> {
    // ---------------------------------------------------------------------
    // Entry rules
    // ---------------------------------------------------------------------

    /// singleStatement : statement ';'* EOF
    ///
    /// # Errors
    ///
    /// Returns [`Abort::Syntax`] for malformed input and
    /// [`Abort::RetryExact`] when approximate prediction gives up.
    pub fn single_statement(&mut self) -> Result<RuleNode, Abort> {
        self.entry(Rule::SingleStatement, |p| {
            p.statement()?;
            while p.accept(TokenKind::Semicolon)? {}
            p.end_of_input(&[TokenKind::Eof, TokenKind::Semicolon])
        })
    }

    /// singleExpression : namedExpression EOF
    ///
    /// # Errors
    ///
    /// See [`Parser::single_statement`].
    pub fn single_expression(&mut self) -> Result<RuleNode, Abort> {
        self.entry(Rule::SingleExpression, |p| {
            p.named_expression()?;
            p.end_of_input(&[TokenKind::Eof])
        })
    }

    /// singleTableIdentifier : tableIdentifier EOF
    ///
    /// # Errors
    ///
    /// See [`Parser::single_statement`].
    pub fn single_table_identifier(&mut self) -> Result<RuleNode, Abort> {
        self.entry(Rule::SingleTableIdentifier, |p| {
            p.table_identifier()?;
            p.end_of_input(&[TokenKind::Eof])
        })
    }

    /// singleFunctionIdentifier : functionIdentifier EOF
    ///
    /// # Errors
    ///
    /// See [`Parser::single_statement`].
    pub fn single_function_identifier(&mut self) -> Result<RuleNode, Abort> {
        self.entry(Rule::SingleFunctionIdentifier, |p| {
            p.function_identifier()?;
            p.end_of_input(&[TokenKind::Eof])
        })
    }

    /// singleDataType : dataType EOF
    ///
    /// # Errors
    ///
    /// See [`Parser::single_statement`].
    pub fn single_data_type(&mut self) -> Result<RuleNode, Abort> {
        self.entry(Rule::SingleDataType, |p| {
            p.data_type()?;
            p.end_of_input(&[TokenKind::Eof])
        })
    }

    /// singleTableSchema : colTypeList EOF
    ///
    /// # Errors
    ///
    /// See [`Parser::single_statement`].
    pub fn single_table_schema(&mut self) -> Result<RuleNode, Abort> {
        self.entry(Rule::SingleTableSchema, |p| {
            p.col_type_list()?;
            p.end_of_input(&[TokenKind::Eof])
        })
    }

    fn end_of_input(&mut self, expected: &[TokenKind]) -> PResult<()> {
        if self.at(TokenKind::Eof)? {
            self.consume()
        } else {
            Err(self.mismatch(expected))
        }
    }

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------

    fn statement(&mut self) -> PResult<()> {
        match self.kind(1)? {
            TokenKind::Keyword(
                Keyword::Select | Keyword::With | Keyword::Values | Keyword::Table,
            )
            | TokenKind::LeftParen => self.rule(Rule::StatementDefault, Self::query),
            TokenKind::Keyword(Keyword::Insert) => self.rule(Rule::InsertInto, Self::insert_into),
            TokenKind::Keyword(Keyword::Delete) => {
                self.rule(Rule::DeleteFromTable, |p| {
                    p.consume()?;
                    p.expect_keyword(Keyword::From)?;
                    p.table_identifier()?;
                    p.table_alias()?;
                    p.optional_where_clause()
                })
            }
            TokenKind::Keyword(Keyword::Update) => self.rule(Rule::UpdateTable, |p| {
                p.consume()?;
                p.table_identifier()?;
                p.table_alias()?;
                p.expect_keyword(Keyword::Set)?;
                p.assignment()?;
                while p.accept(TokenKind::Comma)? {
                    p.assignment()?;
                }
                p.optional_where_clause()
            }),
            TokenKind::Keyword(Keyword::Create) => self.rule(Rule::CreateTable, |p| {
                p.consume()?;
                p.expect_keyword(Keyword::Table)?;
                if p.at_keyword(Keyword::If)? && p.kind(2)? == TokenKind::Keyword(Keyword::Not) {
                    p.consume()?;
                    p.consume()?;
                    p.expect_keyword(Keyword::Exists)?;
                }
                p.table_identifier()?;
                p.expect(TokenKind::LeftParen)?;
                p.col_type_list()?;
                p.expect(TokenKind::RightParen)
            }),
            TokenKind::Keyword(Keyword::Drop) => self.rule(Rule::DropTable, |p| {
                p.consume()?;
                p.expect_keyword(Keyword::Table)?;
                if p.at_keyword(Keyword::If)?
                    && p.kind(2)? == TokenKind::Keyword(Keyword::Exists)
                {
                    p.consume()?;
                    p.consume()?;
                }
                p.table_identifier()
            }),
            TokenKind::Keyword(Keyword::Explain) => self.rule(Rule::Explain, |p| {
                p.consume()?;
                p.accept_keyword(Keyword::Extended)?;
                p.statement()
            }),
            TokenKind::Keyword(
                Keyword::Set
                | Keyword::Use
                | Keyword::Grant
                | Keyword::Revoke
                | Keyword::Lock
                | Keyword::Unlock
                | Keyword::Analyze,
            ) => self.rule(Rule::NativeCommand, |p| {
                while !p.at(TokenKind::Eof)? && !p.at(TokenKind::Semicolon)? {
                    p.consume()?;
                }
                Ok(())
            }),
            _ => Err(self.no_viable()),
        }
    }

    /// INSERT (INTO | OVERWRITE) TABLE? tableIdentifier identifierList? query
    fn insert_into(&mut self) -> PResult<()> {
        self.expect_keyword(Keyword::Insert)?;
        if !self.accept_keyword(Keyword::Into)? && !self.accept_keyword(Keyword::Overwrite)? {
            return Err(self.mismatch(&[
                TokenKind::Keyword(Keyword::Into),
                TokenKind::Keyword(Keyword::Overwrite),
            ]));
        }
        self.accept_keyword(Keyword::Table)?;
        self.table_identifier()?;
        if self.at(TokenKind::LeftParen)? {
            let alts: [Alternative<S>; 2] = [Self::identifier_list, |_| Ok(())];
            if self.predict(Decision::InsertColumns, &alts)? == 0 {
                self.identifier_list()?;
            }
        }
        self.query()
    }

    /// assignment : qualifiedName '=' expression
    fn assignment(&mut self) -> PResult<()> {
        self.rule(Rule::Assignment, |p| {
            p.qualified_name()?;
            p.expect(TokenKind::Eq)?;
            p.expression()
        })
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// query : (WITH namedQuery (',' namedQuery)*)? queryNoWith
    pub(crate) fn query(&mut self) -> PResult<()> {
        self.rule(Rule::Query, |p| {
            if p.at_keyword(Keyword::With)? {
                p.rule(Rule::Ctes, |p| {
                    p.consume()?;
                    p.named_query()?;
                    while p.accept(TokenKind::Comma)? {
                        p.named_query()?;
                    }
                    Ok(())
                })?;
            }
            p.query_no_with()
        })
    }

    /// namedQuery : identifier AS? '(' query ')'
    fn named_query(&mut self) -> PResult<()> {
        self.rule(Rule::NamedQuery, |p| {
            p.identifier()?;
            p.accept_keyword(Keyword::As)?;
            p.expect(TokenKind::LeftParen)?;
            p.query()?;
            p.expect(TokenKind::RightParen)
        })
    }

    /// queryNoWith : queryTerm (ORDER BY sortItem (',' sortItem)*)?
    ///               (LIMIT expression)? (OFFSET expression)?
    fn query_no_with(&mut self) -> PResult<()> {
        self.rule(Rule::QueryNoWith, |p| {
            p.query_term()?;
            if p.accept_keyword(Keyword::Order)? {
                p.expect_keyword(Keyword::By)?;
                p.sort_item()?;
                while p.accept(TokenKind::Comma)? {
                    p.sort_item()?;
                }
            }
            if p.accept_keyword(Keyword::Limit)? {
                p.expression()?;
            }
            if p.accept_keyword(Keyword::Offset)? {
                p.expression()?;
            }
            Ok(())
        })
    }

    /// queryTerm : intersectTerm ((UNION | EXCEPT) setQuantifier? intersectTerm)*
    fn query_term(&mut self) -> PResult<()> {
        self.rule(Rule::QueryTerm, |p| {
            p.intersect_term()?;
            while matches!(
                p.kind(1)?,
                TokenKind::Keyword(Keyword::Union | Keyword::Except)
            ) {
                p.consume()?;
                p.set_quantifier()?;
                p.intersect_term()?;
            }
            Ok(())
        })
    }

    /// intersectTerm : queryPrimary (INTERSECT setQuantifier? queryPrimary)*
    fn intersect_term(&mut self) -> PResult<()> {
        self.rule(Rule::IntersectTerm, |p| {
            p.query_primary()?;
            while p.accept_keyword(Keyword::Intersect)? {
                p.set_quantifier()?;
                p.query_primary()?;
            }
            Ok(())
        })
    }

    /// setQuantifier : DISTINCT | ALL
    fn set_quantifier(&mut self) -> PResult<()> {
        if !self.accept_keyword(Keyword::Distinct)? {
            self.accept_keyword(Keyword::All)?;
        }
        Ok(())
    }

    fn query_primary(&mut self) -> PResult<()> {
        match self.kind(1)? {
            TokenKind::Keyword(Keyword::Select) => self.query_specification(),
            TokenKind::Keyword(Keyword::Table) => self.rule(Rule::TableQuery, |p| {
                p.consume()?;
                p.table_identifier()
            }),
            TokenKind::Keyword(Keyword::Values) => self.inline_table(),
            TokenKind::LeftParen => self.rule(Rule::ParenthesizedQuery, |p| {
                p.consume()?;
                p.query_no_with()?;
                p.expect(TokenKind::RightParen)
            }),
            _ => Err(self.mismatch(&[
                TokenKind::LeftParen,
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::Table),
                TokenKind::Keyword(Keyword::Values),
            ])),
        }
    }

    /// querySpecification : SELECT setQuantifier? namedExpression (',' namedExpression)*
    ///                      fromClause? whereClause? aggregationClause? havingClause?
    fn query_specification(&mut self) -> PResult<()> {
        self.rule(Rule::QuerySpecification, |p| {
            p.expect_keyword(Keyword::Select)?;
            p.set_quantifier()?;
            p.named_expression()?;
            while p.accept(TokenKind::Comma)? {
                p.named_expression()?;
            }
            if p.at_keyword(Keyword::From)? {
                p.rule(Rule::FromClause, |p| {
                    p.consume()?;
                    p.relation()?;
                    while p.accept(TokenKind::Comma)? {
                        p.relation()?;
                    }
                    Ok(())
                })?;
            }
            p.optional_where_clause()?;
            if p.at_keyword(Keyword::Group)? {
                p.rule(Rule::AggregationClause, |p| {
                    p.consume()?;
                    p.expect_keyword(Keyword::By)?;
                    p.expression()?;
                    while p.accept(TokenKind::Comma)? {
                        p.expression()?;
                    }
                    Ok(())
                })?;
            }
            if p.at_keyword(Keyword::Having)? {
                p.rule(Rule::HavingClause, |p| {
                    p.consume()?;
                    p.expression()
                })?;
            }
            Ok(())
        })
    }

    fn optional_where_clause(&mut self) -> PResult<()> {
        if self.at_keyword(Keyword::Where)? {
            self.rule(Rule::WhereClause, |p| {
                p.consume()?;
                p.expression()
            })?;
        }
        Ok(())
    }

    /// namedExpression : expression (AS? identifier)?
    fn named_expression(&mut self) -> PResult<()> {
        self.rule(Rule::NamedExpression, |p| {
            p.expression()?;
            if p.accept_keyword(Keyword::As)? || p.kind(1)?.is_identifier_like() {
                p.identifier()?;
            }
            Ok(())
        })
    }

    /// sortItem : expression (ASC | DESC)? (NULLS (FIRST | LAST))?
    fn sort_item(&mut self) -> PResult<()> {
        self.rule(Rule::SortItem, |p| {
            p.expression()?;
            if !p.accept_keyword(Keyword::Asc)? {
                p.accept_keyword(Keyword::Desc)?;
            }
            if p.accept_keyword(Keyword::Nulls)?
                && !p.accept_keyword(Keyword::First)?
                && !p.accept_keyword(Keyword::Last)?
            {
                return Err(p.mismatch(&[
                    TokenKind::Keyword(Keyword::First),
                    TokenKind::Keyword(Keyword::Last),
                ]));
            }
            Ok(())
        })
    }

    /// inlineTable : VALUES expression (',' expression)*
    fn inline_table(&mut self) -> PResult<()> {
        self.rule(Rule::InlineTable, |p| {
            p.expect_keyword(Keyword::Values)?;
            p.expression()?;
            while p.accept(TokenKind::Comma)? {
                p.expression()?;
            }
            Ok(())
        })
    }

    // ---------------------------------------------------------------------
    // Relations
    // ---------------------------------------------------------------------

    /// relation : relationPrimary joinRelation*
    fn relation(&mut self) -> PResult<()> {
        self.rule(Rule::Relation, |p| {
            p.relation_primary()?;
            while matches!(
                p.kind(1)?,
                TokenKind::Keyword(
                    Keyword::Join
                        | Keyword::Inner
                        | Keyword::Cross
                        | Keyword::Left
                        | Keyword::Right
                        | Keyword::Full
                        | Keyword::Natural
                )
            ) {
                p.join_relation()?;
            }
            Ok(())
        })
    }

    /// joinRelation : joinType JOIN relationPrimary joinCriteria?
    ///              | NATURAL joinType JOIN relationPrimary
    fn join_relation(&mut self) -> PResult<()> {
        self.rule(Rule::JoinRelation, |p| {
            let natural = p.accept_keyword(Keyword::Natural)?;
            p.join_type()?;
            p.expect_keyword(Keyword::Join)?;
            p.relation_primary()?;
            if natural {
                return Ok(());
            }
            match p.kind(1)? {
                TokenKind::Keyword(Keyword::On) => p.rule(Rule::JoinCriteria, |p| {
                    p.consume()?;
                    p.expression()
                }),
                TokenKind::Keyword(Keyword::Using) => p.rule(Rule::JoinCriteria, |p| {
                    p.consume()?;
                    p.identifier_list()
                }),
                _ => Ok(()),
            }
        })
    }

    /// joinType : INNER? | CROSS | LEFT OUTER? | LEFT SEMI | LEFT ANTI
    ///          | RIGHT OUTER? | FULL OUTER?
    fn join_type(&mut self) -> PResult<()> {
        self.rule(Rule::JoinType, |p| {
            match p.kind(1)? {
                TokenKind::Keyword(Keyword::Inner | Keyword::Cross) => p.consume()?,
                TokenKind::Keyword(Keyword::Left) => {
                    p.consume()?;
                    if !p.accept_keyword(Keyword::Outer)? && !p.accept_keyword(Keyword::Semi)? {
                        p.accept_keyword(Keyword::Anti)?;
                    }
                }
                TokenKind::Keyword(Keyword::Right | Keyword::Full) => {
                    p.consume()?;
                    p.accept_keyword(Keyword::Outer)?;
                }
                _ => {}
            }
            Ok(())
        })
    }

    fn relation_primary(&mut self) -> PResult<()> {
        match self.kind(1)? {
            TokenKind::LeftParen => {
                let alts: [Alternative<S>; 2] = [Self::aliased_query, Self::aliased_relation];
                if self.predict(Decision::ParenthesizedRelation, &alts)? == 0 {
                    self.rule(Rule::AliasedQuery, |p| {
                        p.aliased_query()?;
                        p.table_alias()
                    })
                } else {
                    self.rule(Rule::AliasedRelation, |p| {
                        p.aliased_relation()?;
                        p.table_alias()
                    })
                }
            }
            TokenKind::Keyword(Keyword::Values) => self.rule(Rule::InlineTableRelation, |p| {
                p.inline_table()?;
                p.table_alias()
            }),
            _ => self.rule(Rule::TableName, |p| {
                p.table_identifier()?;
                p.table_alias()
            }),
        }
    }

    /// '(' queryNoWith ')'
    fn aliased_query(&mut self) -> PResult<()> {
        self.expect(TokenKind::LeftParen)?;
        self.query_no_with()?;
        self.expect(TokenKind::RightParen)
    }

    /// '(' relation ')'
    fn aliased_relation(&mut self) -> PResult<()> {
        self.expect(TokenKind::LeftParen)?;
        self.relation()?;
        self.expect(TokenKind::RightParen)
    }

    /// tableAlias : (AS? identifier)?
    fn table_alias(&mut self) -> PResult<()> {
        self.rule(Rule::TableAlias, |p| {
            if p.accept_keyword(Keyword::As)? || p.kind(1)?.is_identifier_like() {
                p.identifier()?;
            }
            Ok(())
        })
    }

    // ---------------------------------------------------------------------
    // Data types and column lists
    // ---------------------------------------------------------------------

    /// dataType : ARRAY '<' dataType '>'
    ///          | MAP '<' dataType ',' dataType '>'
    ///          | STRUCT ('<' complexColTypeList? '>' | '<>')
    ///          | identifier ('(' `INTEGER_VALUE` (',' `INTEGER_VALUE`)* ')')?
    pub(crate) fn data_type(&mut self) -> PResult<()> {
        let complex = match self.kind(1)? {
            TokenKind::Keyword(kw @ (Keyword::Array | Keyword::Map | Keyword::Struct)) => {
                let next = self.kind(2)?;
                next == TokenKind::Lt || (kw == Keyword::Struct && next == TokenKind::NotEq)
            }
            _ => false,
        };
        if !complex {
            return self.rule(Rule::PrimitiveDataType, |p| {
                p.identifier()?;
                if p.accept(TokenKind::LeftParen)? {
                    p.expect(TokenKind::Integer)?;
                    while p.accept(TokenKind::Comma)? {
                        p.expect(TokenKind::Integer)?;
                    }
                    p.expect(TokenKind::RightParen)?;
                }
                Ok(())
            });
        }

        self.rule(Rule::ComplexDataType, |p| {
            let keyword = p.kind(1)?;
            p.consume()?;
            if keyword == TokenKind::Keyword(Keyword::Struct) && p.accept(TokenKind::NotEq)? {
                return Ok(());
            }
            p.expect(TokenKind::Lt)?;
            match keyword {
                TokenKind::Keyword(Keyword::Array) => p.data_type()?,
                TokenKind::Keyword(Keyword::Map) => {
                    p.data_type()?;
                    p.expect(TokenKind::Comma)?;
                    p.data_type()?;
                }
                _ => {
                    if !p.at(TokenKind::Gt)? {
                        p.rule(Rule::ComplexColTypeList, |p| {
                            p.complex_col_type()?;
                            while p.accept(TokenKind::Comma)? {
                                p.complex_col_type()?;
                            }
                            Ok(())
                        })?;
                    }
                }
            }
            p.expect(TokenKind::Gt)
        })
    }

    /// complexColType : identifier ':'? dataType (NOT NULL)? (COMMENT STRING)?
    fn complex_col_type(&mut self) -> PResult<()> {
        self.rule(Rule::ComplexColType, |p| {
            p.identifier()?;
            p.accept(TokenKind::Colon)?;
            p.data_type()?;
            p.column_options()
        })
    }

    /// colTypeList : colType (',' colType)*
    fn col_type_list(&mut self) -> PResult<()> {
        self.rule(Rule::ColTypeList, |p| {
            p.col_type()?;
            while p.accept(TokenKind::Comma)? {
                p.col_type()?;
            }
            Ok(())
        })
    }

    /// colType : identifier dataType (NOT NULL)? (COMMENT STRING)?
    fn col_type(&mut self) -> PResult<()> {
        self.rule(Rule::ColType, |p| {
            p.identifier()?;
            p.data_type()?;
            p.column_options()
        })
    }

    fn column_options(&mut self) -> PResult<()> {
        if self.accept_keyword(Keyword::Not)? {
            self.expect_keyword(Keyword::Null)?;
        }
        if self.accept_keyword(Keyword::Comment)? {
            self.expect(TokenKind::String)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Names
    // ---------------------------------------------------------------------

    /// tableIdentifier : (db=identifier '.')? table=identifier
    fn table_identifier(&mut self) -> PResult<()> {
        self.rule(Rule::TableIdentifier, Self::two_part_name)
    }

    /// functionIdentifier : (db=identifier '.')? function=identifier
    fn function_identifier(&mut self) -> PResult<()> {
        self.rule(Rule::FunctionIdentifier, Self::two_part_name)
    }

    fn two_part_name(&mut self) -> PResult<()> {
        self.identifier()?;
        if self.accept(TokenKind::Dot)? {
            self.identifier()?;
        }
        Ok(())
    }

    /// qualifiedName : identifier ('.' identifier)*
    pub(crate) fn qualified_name(&mut self) -> PResult<()> {
        self.rule(Rule::QualifiedName, |p| {
            p.identifier()?;
            while p.at(TokenKind::Dot)? && p.kind(2)?.is_identifier_like() {
                p.consume()?;
                p.identifier()?;
            }
            Ok(())
        })
    }

    /// identifierList : '(' identifier (',' identifier)* ')'
    fn identifier_list(&mut self) -> PResult<()> {
        self.rule(Rule::IdentifierList, |p| {
            p.expect(TokenKind::LeftParen)?;
            p.identifier()?;
            while p.accept(TokenKind::Comma)? {
                p.identifier()?;
            }
            p.expect(TokenKind::RightParen)
        })
    }

    /// identifier : IDENTIFIER | quotedIdentifier | nonReserved
    pub(crate) fn identifier(&mut self) -> PResult<()> {
        self.rule(Rule::Identifier, |p| match p.kind(1)? {
            TokenKind::Identifier => p.consume(),
            TokenKind::QuotedIdentifier => p.rule(Rule::QuotedIdentifier, Self::consume),
            TokenKind::Keyword(kw) if kw.is_non_reserved() => {
                p.rule(Rule::NonReserved, Self::consume)
            }
            _ => Err(p.mismatch(&[TokenKind::Identifier])),
        })
    }
}
