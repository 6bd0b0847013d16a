//! Recursive-descent parser turning a token stream into a [`Module`] (spec
//! §4.1). Performs no verification whatsoever — a module built here may be
//! structurally nonsensical; that's `viper-verify`'s job.

use crate::error::ParseError;
use crate::lexer::{tokenize, TokKind, Token};
use viper_il::{
    Anchor, BasicBlock, CallAttrs, Diagnostic, Extern, FnAttrs, Function, Global, Instruction,
    Linkage, Loc, Module, Opcode, Param, Type, Value,
};

pub fn parse_text(input: &str) -> Result<Module, ParseError> {
    let tokens = tokenize(input)?;
    let mut p = Parser::new(tokens);
    p.parse_module().map_err(ParseError::from)
}

struct Parser {
    toks: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(toks: Vec<Token>) -> Self {
        Parser { toks, pos: 0 }
    }

    fn peek(&self) -> &TokKind {
        &self.toks[self.pos].kind
    }

    fn peek_at(&self, offset: usize) -> &TokKind {
        &self.toks[(self.pos + offset).min(self.toks.len() - 1)].kind
    }

    fn advance(&mut self) -> TokKind {
        let k = self.toks[self.pos].kind.clone();
        if self.pos + 1 < self.toks.len() {
            self.pos += 1;
        }
        k
    }

    fn cur_loc(&self) -> (usize, u32, u32) {
        let t = &self.toks[self.pos];
        (t.offset, t.line, t.col)
    }

    fn err(&self, message: impl Into<String>) -> Diagnostic {
        let (offset, line, col) = self.cur_loc();
        Diagnostic::error(Anchor::Source { offset, line, col }, message.into())
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek(), TokKind::Newline) {
            self.advance();
        }
    }

    fn expect_ident(&mut self, want: &str) -> Result<(), Diagnostic> {
        match self.peek().clone() {
            TokKind::Ident(s) if s == want => {
                self.advance();
                Ok(())
            }
            other => Err(self.err(format!("expected '{want}', found {other:?}"))),
        }
    }

    fn expect(&mut self, want: &TokKind) -> Result<(), Diagnostic> {
        if std::mem::discriminant(self.peek()) == std::mem::discriminant(want) {
            self.advance();
            Ok(())
        } else {
            let found = self.peek().clone();
            Err(self.err(format!("expected {want:?}, found {found:?}")))
        }
    }

    fn take_ident(&mut self) -> Result<String, Diagnostic> {
        match self.advance() {
            TokKind::Ident(s) => Ok(s),
            other => Err(self.err(format!("expected an identifier, found {other:?}"))),
        }
    }

    fn take_at(&mut self) -> Result<String, Diagnostic> {
        match self.advance() {
            TokKind::At(s) => Ok(s),
            other => Err(self.err(format!("expected '@name', found {other:?}"))),
        }
    }

    fn take_percent(&mut self) -> Result<u32, Diagnostic> {
        match self.advance() {
            TokKind::Percent(id) => Ok(id),
            other => Err(self.err(format!("expected '%id', found {other:?}"))),
        }
    }

    fn take_type(&mut self) -> Result<Type, Diagnostic> {
        let name = self.take_ident()?;
        Type::from_mnemonic(&name).ok_or_else(|| self.err(format!("unknown type '{name}'")))
    }

    fn parse_module(&mut self) -> Result<Module, Diagnostic> {
        self.skip_newlines();
        self.expect_ident("il")?;
        let version = self.take_ident()?;
        self.skip_newlines();

        let mut module = Module::new(version);

        if matches!(self.peek(), TokKind::Ident(s) if s == "target") {
            self.advance();
            let triple = match self.advance() {
                TokKind::Str(s) => s,
                other => return Err(self.err(format!("expected a string after 'target', found {other:?}"))),
            };
            module.target = Some(triple);
            self.skip_newlines();
        }

        loop {
            self.skip_newlines();
            match self.peek().clone() {
                TokKind::Eof => break,
                TokKind::Ident(s) if s == "extern" => {
                    let e = self.parse_extern()?;
                    module.externs.push(e);
                }
                TokKind::Ident(s) if s == "global" => {
                    let g = self.parse_global()?;
                    module.globals.push(g);
                }
                TokKind::Ident(s) if s == "func" || s.starts_with("func.") => {
                    let f = self.parse_function()?;
                    module.functions.push(f);
                }
                other => return Err(self.err(format!("expected a top-level entry, found {other:?}"))),
            }
        }
        Ok(module)
    }

    fn parse_extern(&mut self) -> Result<Extern, Diagnostic> {
        self.expect_ident("extern")?;
        let name = self.take_at()?;
        self.expect(&TokKind::LParen)?;
        let mut params = Vec::new();
        while !matches!(self.peek(), TokKind::RParen) {
            params.push(self.take_type()?);
            if matches!(self.peek(), TokKind::Comma) {
                self.advance();
            }
        }
        self.expect(&TokKind::RParen)?;
        self.expect(&TokKind::Arrow)?;
        let ret = self.take_type()?;
        Ok(Extern { name, ret, params })
    }

    fn parse_global(&mut self) -> Result<Global, Diagnostic> {
        self.expect_ident("global")?;
        let ty = self.take_type()?;
        let name = self.take_at()?;
        let init = if matches!(self.peek(), TokKind::Eq) {
            self.advance();
            Some(self.parse_value()?)
        } else {
            None
        };
        Ok(Global { name, ty, init })
    }

    fn parse_function(&mut self) -> Result<Function, Diagnostic> {
        let head = self.take_ident()?; // "func" or "func.attr1.attr2"
        let mut parts = head.split('.');
        parts.next(); // "func"
        let mut linkage = Linkage::Internal;
        let mut attrs = FnAttrs::default();
        for attr in parts {
            match attr {
                "export" => linkage = Linkage::Export,
                "import" => linkage = Linkage::Import,
                "internal" => linkage = Linkage::Internal,
                "nothrow" => attrs.nothrow = true,
                "pure" => attrs.pure = true,
                "readonly" => attrs.readonly = true,
                other => return Err(self.err(format!("unknown function attribute '{other}'"))),
            }
        }

        let name = self.take_at()?;
        self.expect(&TokKind::LParen)?;
        let mut params = Vec::new();
        while !matches!(self.peek(), TokKind::RParen) {
            let ty = self.take_type()?;
            let id = self.take_percent()?;
            params.push(Param::new(id, id.to_string(), ty));
            if matches!(self.peek(), TokKind::Comma) {
                self.advance();
            }
        }
        self.expect(&TokKind::RParen)?;
        self.expect(&TokKind::Arrow)?;
        let ret = self.take_type()?;

        let mut f = Function::new(name, ret, linkage);
        f.attrs = attrs;
        f.params = params;

        self.skip_newlines();
        if matches!(linkage, Linkage::Import) {
            return Ok(f);
        }

        self.expect(&TokKind::LBrace)?;
        self.skip_newlines();
        while !matches!(self.peek(), TokKind::RBrace) {
            let block = self.parse_block()?;
            f.blocks.push(block);
            self.skip_newlines();
        }
        self.expect(&TokKind::RBrace)?;
        Ok(f)
    }

    fn is_block_header(&self) -> bool {
        matches!(self.peek(), TokKind::Ident(s) if s != "call" && Opcode::from_mnemonic(s).is_none() && !s.starts_with('.'))
            && match self.peek_at(1) {
                TokKind::Colon | TokKind::LParen => true,
                _ => false,
            }
    }

    fn parse_block(&mut self) -> Result<BasicBlock, Diagnostic> {
        if !self.is_block_header() {
            return Err(self.err("expected a block label"));
        }
        let label = self.take_ident()?;
        let mut block = BasicBlock::new(label);
        if matches!(self.peek(), TokKind::LParen) {
            self.advance();
            while !matches!(self.peek(), TokKind::RParen) {
                let ty = self.take_type()?;
                let id = self.take_percent()?;
                block.params.push(Param::new(id, id.to_string(), ty));
                if matches!(self.peek(), TokKind::Comma) {
                    self.advance();
                }
            }
            self.expect(&TokKind::RParen)?;
        }
        self.expect(&TokKind::Colon)?;
        self.skip_newlines();

        let mut pending_loc: Option<Loc> = None;
        loop {
            match self.peek().clone() {
                TokKind::Ident(s) if s == ".loc" => {
                    self.advance();
                    let file_id = self.take_int()? as u32;
                    let line = self.take_int()? as u32;
                    let col = self.take_int()? as u32;
                    pending_loc = Some(Loc::new(file_id, line, col));
                    self.skip_newlines();
                }
                TokKind::RBrace | TokKind::Eof => break,
                _ if self.is_block_header() => break,
                _ => {
                    let mut instr = self.parse_instruction()?;
                    if let Some(loc) = pending_loc.take() {
                        instr.loc = loc;
                    } else if let Some(prev) = block.instructions.last() {
                        instr.loc = prev.loc;
                    }
                    block.push(instr);
                    self.skip_newlines();
                }
            }
        }
        Ok(block)
    }

    fn take_int(&mut self) -> Result<i64, Diagnostic> {
        match self.advance() {
            TokKind::Int(n) => Ok(n),
            other => Err(self.err(format!("expected an integer, found {other:?}"))),
        }
    }

    fn parse_value(&mut self) -> Result<Value, Diagnostic> {
        match self.advance() {
            TokKind::Percent(id) => Ok(Value::Temp(id)),
            TokKind::At(name) => Ok(Value::GlobalAddr(name)),
            TokKind::Int(n) => Ok(Value::ConstInt(n, false)),
            TokKind::Float(f) => Ok(Value::ConstFloat(f)),
            TokKind::Str(s) => Ok(Value::ConstStr(s)),
            TokKind::Ident(s) if s == "null" => Ok(Value::NullPtr),
            TokKind::Ident(s) if s == "true" => Ok(Value::ConstInt(1, true)),
            TokKind::Ident(s) if s == "false" => Ok(Value::ConstInt(0, true)),
            other => Err(self.err(format!("expected a value, found {other:?}"))),
        }
    }

    /// `label(arg, arg, ...)` or a bare `label` with no argument list.
    fn parse_label_args(&mut self) -> Result<(String, Vec<Value>), Diagnostic> {
        let label = self.take_ident()?;
        let mut args = Vec::new();
        if matches!(self.peek(), TokKind::LParen) {
            self.advance();
            while !matches!(self.peek(), TokKind::RParen) {
                args.push(self.parse_value()?);
                if matches!(self.peek(), TokKind::Comma) {
                    self.advance();
                }
            }
            self.expect(&TokKind::RParen)?;
        }
        Ok((label, args))
    }

    fn parse_instruction(&mut self) -> Result<Instruction, Diagnostic> {
        let result_id = if matches!(self.peek(), TokKind::Percent(_)) {
            let id = self.take_percent()?;
            self.expect(&TokKind::Eq)?;
            Some(id)
        } else {
            None
        };

        let mnemonic = self.take_ident()?;
        let opcode = Opcode::from_mnemonic(&mnemonic)
            .ok_or_else(|| self.err(format!("unknown opcode '{mnemonic}'")))?;
        let mut instr = Instruction::new(opcode);

        match opcode {
            Opcode::Call => {
                let callee = self.take_at()?;
                instr.callee = callee;
                self.expect(&TokKind::LParen)?;
                while !matches!(self.peek(), TokKind::RParen) {
                    instr.operands.push(self.parse_value()?);
                    if matches!(self.peek(), TokKind::Comma) {
                        self.advance();
                    }
                }
                self.expect(&TokKind::RParen)?;
                if matches!(self.peek(), TokKind::Ident(s) if s == "tail") {
                    self.advance();
                    instr.call_attrs.tail = true;
                }
            }
            Opcode::CallIndirect => {
                instr.operands.push(self.parse_value()?);
                self.expect(&TokKind::LParen)?;
                while !matches!(self.peek(), TokKind::RParen) {
                    instr.operands.push(self.parse_value()?);
                    if matches!(self.peek(), TokKind::Comma) {
                        self.advance();
                    }
                }
                self.expect(&TokKind::RParen)?;
            }
            Opcode::Br => {
                let (label, args) = self.parse_label_args()?;
                instr.labels.push(label);
                instr.br_args.push(args);
            }
            Opcode::CBr => {
                instr.operands.push(self.parse_value()?);
                self.expect(&TokKind::Comma)?;
                let (lt, at) = self.parse_label_args()?;
                self.expect(&TokKind::Comma)?;
                let (lf, af) = self.parse_label_args()?;
                instr.labels.push(lt);
                instr.br_args.push(at);
                instr.labels.push(lf);
                instr.br_args.push(af);
            }
            Opcode::SwitchI32 => {
                let _ty = self.take_type()?;
                instr.operands.push(self.parse_value()?);
                self.expect(&TokKind::Comma)?;
                self.expect_ident("default")?;
                self.expect(&TokKind::Colon)?;
                let (dl, da) = self.parse_label_args()?;
                instr.labels.push(dl);
                instr.br_args.push(da);
                while matches!(self.peek(), TokKind::Comma) {
                    self.advance();
                    let arm_val = self.take_int()?;
                    self.expect(&TokKind::Colon)?;
                    let (lbl, args) = self.parse_label_args()?;
                    instr.operands.push(Value::ConstInt(arm_val, false));
                    instr.labels.push(lbl);
                    instr.br_args.push(args);
                }
            }
            Opcode::ResumeLabel => {
                instr.operands.push(self.parse_value()?);
                self.expect(&TokKind::Comma)?;
                let (label, args) = self.parse_label_args()?;
                instr.labels.push(label);
                instr.br_args.push(args);
            }
            Opcode::EhPush => {
                let (label, args) = self.parse_label_args()?;
                instr.labels.push(label);
                instr.br_args.push(args);
            }
            _ => {
                let info = opcode.info();
                // A redundant leading operand-type mnemonic (e.g. `sdiv.chk0
                // i64 10, 0`) is accepted and discarded: the canonical writer
                // never emits one (the result type after `:` already carries
                // it), but it's a natural thing for hand-written IL to carry
                // over from an operator's narrative name.
                if let TokKind::Ident(s) = self.peek() {
                    if Type::from_mnemonic(s).is_some() {
                        self.advance();
                        if matches!(self.peek(), TokKind::Comma) {
                            self.advance();
                        }
                    }
                }
                while !matches!(self.peek(), TokKind::Newline | TokKind::Colon | TokKind::Eof | TokKind::RBrace)
                    && instr.operands.len() < info.max_operands
                {
                    instr.operands.push(self.parse_value()?);
                    if matches!(self.peek(), TokKind::Comma) {
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        if matches!(self.peek(), TokKind::Colon) {
            self.advance();
            let ty = self.take_type()?;
            instr.result_type = ty;
        }
        if let Some(id) = result_id {
            instr.result_id = Some(id);
        }
        Ok(instr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hello_integer_scenario() {
        let src = "il 0.2.0\nextern @Viper.Terminal.SayInt(i64) -> void\nfunc @main() -> void {\nentry:\ncall @Viper.Terminal.SayInt(42)\nret\n}\n";
        let m = parse_text(src).expect("parses");
        assert_eq!(m.version, "0.2.0");
        assert_eq!(m.externs.len(), 1);
        assert_eq!(m.functions.len(), 1);
        let f = &m.functions[0];
        assert_eq!(f.blocks.len(), 1);
        assert_eq!(f.blocks[0].instructions.len(), 2);
        assert_eq!(f.blocks[0].instructions[0].callee, "Viper.Terminal.SayInt");
    }

    #[test]
    fn parses_checked_division_with_result_type() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\n%0 = sdiv.chk0 i64 10, 0 : i64\nret %0\n}\n";
        let m = parse_text(src).unwrap();
        let instr = &m.functions[0].blocks[0].instructions[0];
        assert_eq!(instr.opcode, Opcode::SDivChk0);
        assert_eq!(instr.result_id, Some(0));
        assert_eq!(instr.result_type, Type::I64);
        assert_eq!(instr.operands, vec![Value::ConstInt(10, false), Value::ConstInt(0, false)]);
    }

    #[test]
    fn parses_switch_with_default_and_arms() {
        let src = "il 0.2.0\nfunc @main() -> void {\nentry:\nswitch i32 %v, default: d(), 1: a(), 2: b()\nd:\nret\na:\nret\nb:\nret\n}\n";
        // %v is unresolved here (no prior def); the reader doesn't check SSA, only shape.
        let src = src.replacen("%v", "0", 1);
        let m = parse_text(&src).unwrap();
        let instr = &m.functions[0].blocks[0].instructions[0];
        assert_eq!(instr.opcode, Opcode::SwitchI32);
        assert_eq!(instr.default_label(), Some("d"));
        let arms: Vec<_> = instr.switch_arms().collect();
        assert_eq!(arms.len(), 2);
        assert_eq!(arms[0].0, 1);
        assert_eq!(arms[0].1, "a");
        assert_eq!(arms[1].1, "b");
    }

    #[test]
    fn unknown_opcode_is_a_parse_error() {
        let src = "il 0.2.0\nfunc @main() -> void {\nentry:\nbogus 1\n}\n";
        assert!(parse_text(src).is_err());
    }

    #[test]
    fn loc_directive_attaches_to_the_next_instruction() {
        let src = "il 0.2.0\nfunc @main() -> void {\nentry:\n.loc 1 10 4\nret\n}\n";
        let m = parse_text(src).unwrap();
        let instr = &m.functions[0].blocks[0].instructions[0];
        assert_eq!(instr.loc, Loc::new(1, 10, 4));
    }

    #[test]
    fn eh_push_captures_the_handler_label() {
        let src = "il 0.2.0\nfunc @main() -> i64 {\nentry:\neh.push H\neh.pop\nret 0\nH(error %0, resume_tok %1):\nret 1\n}\n";
        let m = parse_text(src).unwrap();
        let push = &m.functions[0].blocks[0].instructions[0];
        assert_eq!(push.opcode, Opcode::EhPush);
        assert_eq!(push.labels, vec!["H".to_string()]);
        assert_eq!(m.functions[0].blocks[1].label, "H");
    }

    #[test]
    fn import_functions_have_no_body() {
        let src = "il 0.2.0\nfunc.import @Host.Foo() -> void\nfunc @main() -> void {\nentry:\nret\n}\n";
        let m = parse_text(src).unwrap();
        assert_eq!(m.functions[0].linkage, Linkage::Import);
        assert!(m.functions[0].blocks.is_empty());
    }
}
