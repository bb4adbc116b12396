//! Recursive descent parser for the Jack language.
//!
//! Consumes a [`TokenStream`] and builds the concrete [`ParseNode`] tree,
//! one non-terminal per grammar production. Matching is strict: the first
//! unexpected token aborts with an error quoting the offending literal.

use crate::error::Result;
use crate::token::{Keyword, Token, TokenStream};
use crate::tree::{NodeTag, ParseNode};

/// Maximum expression nesting depth before the parser bails out.
/// Prevents stack overflow on pathological input (e.g., `(((((...)))))`).
/// 25 is generous for real Jack programs (typical nesting: 3-5 levels).
const MAX_DEPTH: usize = 25;

/// Binary operators of the `expression` production.
const OPS: &[char] = &['+', '-', '*', '/', '&', '|', '<', '>', '='];

/// Recursive descent parser over a token stream.
pub struct Parser<'a> {
    tokens: &'a mut TokenStream,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a mut TokenStream) -> Self {
        Self { tokens, depth: 0 }
    }

    /// Parse a whole source file: zero or more class declarations followed
    /// by end of input.
    pub fn parse(mut self) -> Result<Vec<ParseNode>> {
        let mut classes = Vec::new();

        while self.peek_keyword() == Some(Keyword::Class) {
            classes.push(self.parse_class()?);
        }

        match self.tokens.advance() {
            Token::Eof => Ok(classes),
            _ => Err(self
                .tokens
                .error("All top level declarations must be classes")),
        }
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn peek_keyword(&self) -> Option<Keyword> {
        match self.tokens.peek(0) {
            Token::Keyword(k) => Some(*k),
            _ => None,
        }
    }

    fn peek_symbol(&self) -> Option<char> {
        match self.tokens.peek(0) {
            Token::Symbol(c) => Some(*c),
            _ => None,
        }
    }

    fn eat_keyword(
        &mut self,
        children: &mut Vec<ParseNode>,
        keyword: Keyword,
        message: &str,
    ) -> Result<()> {
        match self.tokens.advance() {
            Token::Keyword(k) if k == keyword => {
                children.push(ParseNode::Terminal(Token::Keyword(k)));
                Ok(())
            }
            _ => Err(self.tokens.error(message)),
        }
    }

    fn eat_symbol(&mut self, children: &mut Vec<ParseNode>, symbol: char) -> Result<()> {
        match self.tokens.advance() {
            Token::Symbol(c) if c == symbol => {
                children.push(ParseNode::Terminal(Token::Symbol(c)));
                Ok(())
            }
            _ => Err(self.tokens.error(format!("Expected \"{}\"", symbol))),
        }
    }

    fn eat_identifier(&mut self, children: &mut Vec<ParseNode>) -> Result<()> {
        let token = self.tokens.advance();
        if token.is_identifier() {
            children.push(ParseNode::Terminal(token));
            Ok(())
        } else {
            Err(self
                .tokens
                .error(format!("Invalid identifier \"{}\"", token)))
        }
    }

    /// type: 'int' | 'char' | 'boolean' | className
    fn eat_type(&mut self, children: &mut Vec<ParseNode>) -> Result<()> {
        let token = self.tokens.advance();
        match token {
            Token::Keyword(Keyword::Int | Keyword::Char | Keyword::Boolean)
            | Token::Identifier(_) => {
                children.push(ParseNode::Terminal(token));
                Ok(())
            }
            _ => Err(self.tokens.error(format!("Invalid type \"{}\"", token))),
        }
    }

    /// Shared tail of classVarDec and varDec:
    /// type varName (',' varName)* ';'
    fn eat_var_declaration(&mut self, children: &mut Vec<ParseNode>) -> Result<()> {
        self.eat_type(children)?;
        self.eat_identifier(children)?;

        loop {
            let token = self.tokens.advance();
            match token {
                Token::Symbol(';') => {
                    children.push(ParseNode::Terminal(token));
                    return Ok(());
                }
                Token::Symbol(',') => {
                    children.push(ParseNode::Terminal(token));
                    self.eat_identifier(children)?;
                }
                _ => return Err(self.tokens.error("Expected \",\" or \";\"")),
            }
        }
    }

    /// '{' statements '}'
    fn eat_bracketed_statements(&mut self, children: &mut Vec<ParseNode>) -> Result<()> {
        self.eat_symbol(children, '{')?;
        children.push(self.parse_statements()?);
        self.eat_symbol(children, '}')
    }

    // ========================================================================
    // Grammar productions
    // ========================================================================

    /// class: 'class' className '{' classVarDec* subroutineDec* '}'
    fn parse_class(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        self.eat_keyword(&mut children, Keyword::Class, "Invalid class declaration")?;
        self.eat_identifier(&mut children)?;
        self.eat_symbol(&mut children, '{')?;

        while self.peek_symbol() != Some('}') {
            match self.peek_keyword() {
                Some(Keyword::Static | Keyword::Field) => {
                    children.push(self.parse_class_var_dec()?);
                }
                Some(Keyword::Constructor | Keyword::Function | Keyword::Method) => {
                    children.push(self.parse_subroutine_dec()?);
                }
                _ => {
                    let token = self.tokens.advance();
                    return Err(self
                        .tokens
                        .error(format!("Unexpected token \"{}\"", token)));
                }
            }
        }

        self.eat_symbol(&mut children, '}')?;

        Ok(ParseNode::non_terminal(NodeTag::Class, children))
    }

    /// classVarDec: ('static' | 'field') type varName (',' varName)* ';'
    fn parse_class_var_dec(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        match self.tokens.advance() {
            token @ Token::Keyword(Keyword::Static | Keyword::Field) => {
                children.push(ParseNode::Terminal(token));
            }
            _ => return Err(self.tokens.error("Invalid class variable declaration")),
        }

        self.eat_var_declaration(&mut children)?;

        Ok(ParseNode::non_terminal(NodeTag::ClassVarDec, children))
    }

    /// subroutineDec: ('constructor' | 'function' | 'method') ('void' | type)
    ///                subroutineName '(' parameterList ')' subroutineBody
    fn parse_subroutine_dec(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        match self.tokens.advance() {
            token @ Token::Keyword(Keyword::Constructor | Keyword::Function | Keyword::Method) => {
                children.push(ParseNode::Terminal(token));
            }
            _ => return Err(self.tokens.error("Invalid subroutine declaration")),
        }

        let token = self.tokens.advance();
        match token {
            Token::Keyword(Keyword::Void | Keyword::Int | Keyword::Char | Keyword::Boolean)
            | Token::Identifier(_) => children.push(ParseNode::Terminal(token)),
            _ => return Err(self.tokens.error(format!("Invalid type \"{}\"", token))),
        }

        self.eat_identifier(&mut children)?;
        self.eat_symbol(&mut children, '(')?;
        children.push(self.parse_parameter_list()?);
        self.eat_symbol(&mut children, ')')?;
        children.push(self.parse_subroutine_body()?);

        Ok(ParseNode::non_terminal(NodeTag::SubroutineDec, children))
    }

    /// parameterList: ((type varName) (',' type varName)*)?
    fn parse_parameter_list(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        match self.tokens.peek(0) {
            Token::Keyword(Keyword::Int | Keyword::Char | Keyword::Boolean)
            | Token::Identifier(_) => {
                self.eat_type(&mut children)?;
                self.eat_identifier(&mut children)?;
            }
            Token::Symbol(')') => {}
            _ => {
                let token = self.tokens.advance();
                return Err(self.tokens.error(format!("Invalid type \"{}\"", token)));
            }
        }

        while self.peek_symbol() != Some(')') {
            match self.tokens.advance() {
                token @ Token::Symbol(',') => children.push(ParseNode::Terminal(token)),
                _ => return Err(self.tokens.error("Expected \",\" or \")\"")),
            }
            self.eat_type(&mut children)?;
            self.eat_identifier(&mut children)?;
        }

        Ok(ParseNode::non_terminal(NodeTag::ParameterList, children))
    }

    /// subroutineBody: '{' varDec* statements '}'
    fn parse_subroutine_body(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        self.eat_symbol(&mut children, '{')?;

        while self.peek_keyword() == Some(Keyword::Var) {
            children.push(self.parse_var_dec()?);
        }

        children.push(self.parse_statements()?);
        self.eat_symbol(&mut children, '}')?;

        Ok(ParseNode::non_terminal(NodeTag::SubroutineBody, children))
    }

    /// varDec: 'var' type varName (',' varName)* ';'
    fn parse_var_dec(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        self.eat_keyword(&mut children, Keyword::Var, "Invalid variable declaration")?;
        self.eat_var_declaration(&mut children)?;

        Ok(ParseNode::non_terminal(NodeTag::VarDec, children))
    }

    /// statements: statement*
    ///
    /// The loop ends at the first non-statement token, which the caller
    /// then matches against its own production.
    fn parse_statements(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        loop {
            let statement = match self.peek_keyword() {
                Some(Keyword::Let) => self.parse_let_statement()?,
                Some(Keyword::If) => self.parse_if_statement()?,
                Some(Keyword::While) => self.parse_while_statement()?,
                Some(Keyword::Do) => self.parse_do_statement()?,
                Some(Keyword::Return) => self.parse_return_statement()?,
                _ => break,
            };
            children.push(statement);
        }

        Ok(ParseNode::non_terminal(NodeTag::Statements, children))
    }

    /// letStatement: 'let' varName ('[' expression ']')? '=' expression ';'
    fn parse_let_statement(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        self.eat_keyword(&mut children, Keyword::Let, "Invalid let statement")?;
        self.eat_identifier(&mut children)?;

        if self.peek_symbol() == Some('[') {
            children.push(ParseNode::Terminal(self.tokens.advance()));
            children.push(self.parse_expression()?);
            self.eat_symbol(&mut children, ']')?;
        }

        self.eat_symbol(&mut children, '=')?;
        children.push(self.parse_expression()?);
        self.eat_symbol(&mut children, ';')?;

        Ok(ParseNode::non_terminal(NodeTag::LetStatement, children))
    }

    /// ifStatement: 'if' '(' expression ')' '{' statements '}'
    ///              ('else' '{' statements '}')?
    fn parse_if_statement(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        self.eat_keyword(&mut children, Keyword::If, "Invalid if statement")?;
        self.eat_symbol(&mut children, '(')?;
        children.push(self.parse_expression()?);
        self.eat_symbol(&mut children, ')')?;
        self.eat_bracketed_statements(&mut children)?;

        if self.peek_keyword() == Some(Keyword::Else) {
            children.push(ParseNode::Terminal(self.tokens.advance()));
            self.eat_bracketed_statements(&mut children)?;
        }

        Ok(ParseNode::non_terminal(NodeTag::IfStatement, children))
    }

    /// whileStatement: 'while' '(' expression ')' '{' statements '}'
    fn parse_while_statement(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        self.eat_keyword(&mut children, Keyword::While, "Invalid while statement")?;
        self.eat_symbol(&mut children, '(')?;
        children.push(self.parse_expression()?);
        self.eat_symbol(&mut children, ')')?;
        self.eat_bracketed_statements(&mut children)?;

        Ok(ParseNode::non_terminal(NodeTag::WhileStatement, children))
    }

    /// doStatement: 'do' subroutineCall ';'
    ///
    /// The call must start with an identifier; `do (expr);` is rejected.
    fn parse_do_statement(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        self.eat_keyword(&mut children, Keyword::Do, "Invalid do statement")?;
        children.push(self.parse_subroutine_call()?);
        self.eat_symbol(&mut children, ';')?;

        Ok(ParseNode::non_terminal(NodeTag::DoStatement, children))
    }

    /// returnStatement: 'return' expression? ';'
    fn parse_return_statement(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        self.eat_keyword(&mut children, Keyword::Return, "Invalid return statement")?;

        if self.peek_symbol() != Some(';') {
            children.push(self.parse_expression()?);
        }

        self.eat_symbol(&mut children, ';')?;

        Ok(ParseNode::non_terminal(NodeTag::ReturnStatement, children))
    }

    /// expression: term (op term)*
    fn parse_expression(&mut self) -> Result<ParseNode> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            self.depth -= 1;
            return Err(self.tokens.error("Expression nesting too deep"));
        }
        let result = self.parse_expression_inner();
        self.depth -= 1;
        result
    }

    fn parse_expression_inner(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        children.push(self.parse_term()?);

        while let Some(c) = self.peek_symbol() {
            if !OPS.contains(&c) {
                break;
            }
            children.push(ParseNode::Terminal(self.tokens.advance()));
            children.push(self.parse_term()?);
        }

        Ok(ParseNode::non_terminal(NodeTag::Expression, children))
    }

    /// term: integerConstant | stringConstant | keywordConstant | varName
    ///     | varName '[' expression ']' | subroutineCall
    ///     | '(' expression ')' | unaryOp term
    fn parse_term(&mut self) -> Result<ParseNode> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            self.depth -= 1;
            return Err(self.tokens.error("Expression nesting too deep"));
        }
        let result = self.parse_term_inner();
        self.depth -= 1;
        result
    }

    fn parse_term_inner(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        match self.tokens.peek(0).clone() {
            Token::IntegerConstant(_) | Token::StringConstant(_) => {
                children.push(ParseNode::Terminal(self.tokens.advance()));
            }
            Token::Keyword(Keyword::True | Keyword::False | Keyword::Null | Keyword::This) => {
                children.push(ParseNode::Terminal(self.tokens.advance()));
            }
            Token::Identifier(_) => {
                // The token after the identifier decides: '[' is an array
                // access, '(' or '.' a subroutine call, anything else a
                // bare variable.
                match self.tokens.peek(1) {
                    Token::Symbol('[') => {
                        children.push(ParseNode::Terminal(self.tokens.advance()));
                        children.push(ParseNode::Terminal(self.tokens.advance()));
                        children.push(self.parse_expression()?);
                        self.eat_symbol(&mut children, ']')?;
                    }
                    Token::Symbol('(') | Token::Symbol('.') => {
                        children.push(self.parse_subroutine_call()?);
                    }
                    _ => children.push(ParseNode::Terminal(self.tokens.advance())),
                }
            }
            Token::Symbol('(') => {
                children.push(ParseNode::Terminal(self.tokens.advance()));
                children.push(self.parse_expression()?);
                self.eat_symbol(&mut children, ')')?;
            }
            Token::Symbol(c) if c == '-' || c == '~' => {
                children.push(ParseNode::Terminal(self.tokens.advance()));
                children.push(self.parse_term()?);
            }
            _ => {
                let token = self.tokens.advance();
                return Err(self
                    .tokens
                    .error(format!("Unexpected token \"{}\"", token)));
            }
        }

        Ok(ParseNode::non_terminal(NodeTag::Term, children))
    }

    /// subroutineCall: subroutineName '(' expressionList ')'
    ///               | (className | varName) '.' subroutineName
    ///                 '(' expressionList ')'
    ///
    /// A parser-internal grouping: transparent in spec-conformant XML.
    fn parse_subroutine_call(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        self.eat_identifier(&mut children)?;

        if self.peek_symbol() == Some('.') {
            children.push(ParseNode::Terminal(self.tokens.advance()));
            self.eat_identifier(&mut children)?;
        }

        self.eat_symbol(&mut children, '(')?;
        children.push(self.parse_expression_list()?);
        self.eat_symbol(&mut children, ')')?;

        Ok(ParseNode::non_terminal(NodeTag::SubroutineCall, children))
    }

    /// expressionList: (expression (',' expression)*)?
    fn parse_expression_list(&mut self) -> Result<ParseNode> {
        let mut children = Vec::new();

        if self.peek_symbol() != Some(')') {
            children.push(self.parse_expression()?);
        }

        while self.peek_symbol() != Some(')') {
            match self.tokens.advance() {
                token @ Token::Symbol(',') => children.push(ParseNode::Terminal(token)),
                _ => return Err(self.tokens.error("Expected \",\" or \")\"")),
            }
            children.push(self.parse_expression()?);
        }

        Ok(ParseNode::non_terminal(NodeTag::ExpressionList, children))
    }
}
