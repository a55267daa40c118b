mod quadruple;
mod semantic_error;
mod symbol_table;

pub use quadruple::{write_quadruples, Quadruple};
pub use semantic_error::SemanticError;
pub use symbol_table::{IdentInfo, IdentKind, SymbolTable, TableKind};

pub type Result<T> = std::result::Result<T, SemanticError>;

const GLOBAL: usize = 0;

fn is_exp_level(id: &str) -> bool {
    matches!(id, "Exp" | "RelExp" | "ArithExp" | "Atom")
}

/// One frame of the attribute stack that runs parallel to the parse
/// stack: the symbol's kind, its synthesized value (a lexeme, literal
/// or temporary name), the source line when it came from a token, and
/// the table/entry pair for symbols that resolved an identifier.
#[derive(Clone, Debug)]
pub struct Attribute {
    pub token: String,
    pub value: String,
    pub line: Option<u64>,
    pub table: Option<usize>,
    pub entry: Option<usize>,
}

impl Attribute {
    fn of(token: &str) -> Self {
        Self {
            token: token.to_owned(),
            value: String::new(),
            line: None,
            table: None,
            entry: None,
        }
    }

    fn with_value(token: &str, value: String, line: Option<u64>) -> Self {
        Self {
            token: token.to_owned(),
            value,
            line,
            table: None,
            entry: None,
        }
    }
}

/// The syntax-directed translator. [`reduce`](Semantic::reduce) is
/// called on every reduction; each case pops the frames of the
/// right-hand side and pushes exactly one synthesized frame, also on
/// its error paths, so the attribute stack stays aligned with the
/// parse stack and analysis continues after a reported error.
pub struct Semantic {
    attributes: Vec<Attribute>,
    tables: Vec<SymbolTable>,
    scope_stack: Vec<usize>,
    quadruples: Vec<Quadruple>,
    backpatch: Vec<usize>,
    next_label: usize,
    temp_count: usize,
    main_label: Option<usize>,
}

impl Default for Semantic {
    fn default() -> Self {
        Self::new()
    }
}

impl Semantic {
    pub fn new() -> Self {
        let tables = vec![
            SymbolTable::new(TableKind::Global, "global table"),
            SymbolTable::new(TableKind::Temp, "temp variable table"),
        ];
        Self {
            attributes: Vec::new(),
            tables,
            scope_stack: vec![GLOBAL],
            quadruples: Vec::new(),
            backpatch: Vec::new(),
            // label 0 is reserved for a jump to main
            next_label: 1,
            temp_count: 0,
            main_label: None,
        }
    }

    pub fn quadruples(&self) -> &[Quadruple] {
        &self.quadruples
    }

    pub fn tables(&self) -> &[SymbolTable] {
        &self.tables
    }

    pub fn main_label(&self) -> Option<usize> {
        self.main_label
    }

    /// Called by the parse driver on every shift.
    pub fn push_token(&mut self, kind: &str, lexeme: &str, line: Option<u64>) {
        self.attributes
            .push(Attribute::with_value(kind, lexeme.to_owned(), line));
    }

    /// The label of the next quadruple to be emitted.
    fn peek_label(&self) -> usize {
        self.next_label
    }

    fn alloc_label(&mut self) -> usize {
        let label = self.next_label;
        self.next_label += 1;
        label
    }

    fn new_temp(&mut self) -> String {
        let count = self.temp_count;
        self.temp_count += 1;
        format!("T{count}")
    }

    /// Emits a quadruple at the next label and returns its index for
    /// later backpatching.
    fn emit(&mut self, op: &str, arg1: &str, arg2: &str, result: &str) -> usize {
        let label = self.alloc_label();
        self.quadruples.push(Quadruple::new(label, op, arg1, arg2, result));
        self.quadruples.len() - 1
    }

    fn pop_backpatch(&mut self) -> usize {
        self.backpatch
            .pop()
            .expect("control flow pushed its pending jumps")
    }

    fn fill(&mut self, index: usize, target: String) {
        self.quadruples[index].result = target;
    }

    /// The attribute `back` positions below the stack top, 1-based.
    fn attr(&self, back: usize) -> &Attribute {
        &self.attributes[self.attributes.len() - back]
    }

    /// Pops the right-hand side's frames (none for an epsilon
    /// production) and pushes the synthesized frame.
    fn synthesize(&mut self, rhs: &[&str], attribute: Attribute) {
        let is_epsilon = rhs.len() == 1 && rhs[0] == "@";
        if !is_epsilon {
            let keep = self.attributes.len() - rhs.len();
            self.attributes.truncate(keep);
        }
        self.attributes.push(attribute);
    }

    fn current_scope(&self) -> usize {
        *self.scope_stack.last().expect("global scope stays open")
    }

    pub fn reduce(&mut self, lhs: &str, rhs: &[&str]) -> Result<()> {
        match lhs {
            "Program" => self.program(lhs, rhs),
            "Specifier" | "Aritop" | "Relop" | "Assignop" => {
                self.copy_up(lhs, rhs);
                Ok(())
            }
            "ExtDef" if rhs.get(1) == Some(&"<ID>") => self.global_variable(lhs, rhs),
            "CreateFunTable_m" => self.create_fun_table(lhs),
            "ExitFunTable_m" => self.exit_fun_table(lhs),
            "ParamDec" => self.param_dec(lhs, rhs),
            "Block" => {
                let label = self.peek_label().to_string();
                self.synthesize(rhs, Attribute::with_value(lhs, label, None));
                Ok(())
            }
            "Stmt" if rhs.first() == Some(&"return") => self.return_stmt(lhs, rhs),
            "IfStmt_m1" | "WhileStmt_m1" => {
                self.mark_next_label(lhs);
                Ok(())
            }
            "IfStmt_m2" | "WhileStmt_m2" => {
                self.condition_jumps(lhs);
                Ok(())
            }
            "IfStmt_next" => {
                self.else_skip_marker(lhs);
                Ok(())
            }
            "IfNext" if rhs.first() == Some(&"IfStmt_next") => {
                let value = self.attr(3).value.clone();
                self.synthesize(rhs, Attribute::with_value(lhs, value, None));
                Ok(())
            }
            "IfStmt" => {
                self.if_stmt(lhs, rhs);
                Ok(())
            }
            "WhileStmt" => {
                self.while_stmt(lhs, rhs);
                Ok(())
            }
            "Dec" => self.dec(lhs, rhs),
            "CallFunCheck" => self.call_check(lhs),
            "Args" => {
                self.args(lhs, rhs);
                Ok(())
            }
            _ if is_exp_level(lhs) => self.expression(lhs, rhs),
            _ => {
                self.synthesize(rhs, Attribute::of(lhs));
                Ok(())
            }
        }
    }

    /// `Program -> ExtDefList`
    fn program(&mut self, lhs: &str, rhs: &[&str]) -> Result<()> {
        self.synthesize(rhs, Attribute::of(lhs));
        if self.main_label.is_none() {
            return Err(SemanticError::MainUndefined);
        }
        Ok(())
    }

    /// Single-child productions whose parent takes the child's value
    /// (`Specifier -> int`, `Relop -> >`, stratum hops of `Exp`, ..).
    fn copy_up(&mut self, lhs: &str, rhs: &[&str]) {
        let child = self.attr(1);
        let attribute = Attribute::with_value(lhs, child.value.clone(), child.line);
        self.synthesize(rhs, attribute);
    }

    /// `ExtDef -> Specifier <ID> ;`
    fn global_variable(&mut self, lhs: &str, rhs: &[&str]) -> Result<()> {
        let specifier = self.attr(3).value.clone();
        let id = self.attr(2).clone();

        let redefined = self
            .scope_stack
            .iter()
            .rev()
            .any(|&t| self.tables[t].find(&id.value).is_some());
        if !redefined {
            let scope = self.current_scope();
            self.tables[scope].add(IdentInfo::variable(&specifier, &id.value));
        }

        self.synthesize(rhs, Attribute::with_value(lhs, id.value.clone(), id.line));
        if redefined {
            return Err(SemanticError::VariableRedefined {
                name: id.value,
                line: id.line.unwrap_or(0),
            });
        }
        Ok(())
    }

    /// `CreateFunTable_m -> @`, positioned after the function name in
    /// `FunDec -> <ID> CreateFunTable_m ( VarList )`: the stack top is
    /// the name, below it the specifier.
    fn create_fun_table(&mut self, lhs: &str) -> Result<()> {
        let id = self.attr(1).clone();
        let specifier = self.attr(2).value.clone();

        let redefined = self.tables[GLOBAL].find(&id.value).is_some();

        self.tables
            .push(SymbolTable::new(TableKind::Function, &id.value));
        let table = self.tables.len() - 1;
        if !redefined {
            let entry = IdentInfo::function(&specifier, &id.value, self.peek_label(), table);
            self.tables[GLOBAL].add(entry);
        }
        self.scope_stack.push(table);

        if id.value == "main" {
            self.main_label = Some(self.peek_label());
        }
        self.emit(&id.value, "-", "-", "-");

        let slot = IdentInfo::return_slot(&specifier, format!("{}_ret_val", id.value));
        self.tables[table].add(slot);

        self.attributes
            .push(Attribute::with_value(lhs, id.value.clone(), id.line));
        if redefined {
            return Err(SemanticError::FunctionRedefined {
                name: id.value,
                line: id.line.unwrap_or(0),
            });
        }
        Ok(())
    }

    /// `ExitFunTable_m -> @`, at the end of the function body.
    fn exit_fun_table(&mut self, lhs: &str) -> Result<()> {
        if self.scope_stack.len() > 1 {
            self.scope_stack.pop();
        }
        self.attributes.push(Attribute::of(lhs));
        Ok(())
    }

    /// `ParamDec -> Specifier <ID>`
    fn param_dec(&mut self, lhs: &str, rhs: &[&str]) -> Result<()> {
        let id = self.attr(1).clone();
        let specifier = self.attr(2).value.clone();
        let scope = self.current_scope();

        if self.tables[scope].find(&id.value).is_some() {
            self.synthesize(rhs, Attribute::with_value(lhs, id.value.clone(), id.line));
            return Err(SemanticError::ParameterRedefined {
                name: id.value,
                line: id.line.unwrap_or(0),
            });
        }

        let entry = self.tables[scope].add(IdentInfo::variable(&specifier, &id.value));
        let fun_name = self.tables[scope].name().to_owned();
        if let Some(fun_entry) = self.tables[GLOBAL].find(&fun_name) {
            self.tables[GLOBAL].get_mut(fun_entry).parameter_count += 1;
        }

        let mut attribute = Attribute::with_value(lhs, id.value, id.line);
        attribute.table = Some(scope);
        attribute.entry = entry;
        self.synthesize(rhs, attribute);
        Ok(())
    }

    /// `Stmt -> return Exp ;`
    fn return_stmt(&mut self, lhs: &str, rhs: &[&str]) -> Result<()> {
        let exp = self.attr(2).value.clone();
        let scope = self.current_scope();
        let fun_name = self.tables[scope].name().to_owned();

        let mut value = String::new();
        if !exp.is_empty() {
            if let Some(slot) = self.tables[scope].entries().first() {
                let result = slot.name.clone();
                self.emit(":=", &exp, "-", &result);
            }
            value = exp;
        }
        self.emit("return", "-", "-", &fun_name);

        self.synthesize(rhs, Attribute::with_value(lhs, value, None));
        Ok(())
    }

    /// `IfStmt_m1 -> @` / `WhileStmt_m1 -> @`: remembers where the
    /// condition evaluation starts.
    fn mark_next_label(&mut self, lhs: &str) {
        let label = self.peek_label().to_string();
        self.attributes.push(Attribute::with_value(lhs, label, None));
    }

    /// `IfStmt_m2 -> @` / `WhileStmt_m2 -> @`, after the condition:
    /// emits the false jump then the true jump, both unresolved, and
    /// synthesizes the label of the branch body.
    fn condition_jumps(&mut self, lhs: &str) {
        let exp = self.attr(2).value.clone();

        let false_jump = self.emit("j=", &exp, "0", "");
        self.backpatch.push(false_jump);
        let true_jump = self.emit("j", "-", "-", "");
        self.backpatch.push(true_jump);

        let label = self.peek_label().to_string();
        self.attributes.push(Attribute::with_value(lhs, label, None));
    }

    /// `IfStmt_next -> @`, before `else`: the jump past the else body.
    fn else_skip_marker(&mut self, lhs: &str) {
        let skip = self.emit("j", "-", "-", "");
        self.backpatch.push(skip);
        let label = self.peek_label().to_string();
        self.attributes.push(Attribute::with_value(lhs, label, None));
    }

    /// `IfStmt -> if IfStmt_m1 ( Exp ) IfStmt_m2 Block IfNext`
    fn if_stmt(&mut self, lhs: &str, rhs: &[&str]) {
        let body_start = self.attr(3).value.clone();
        let else_start = self.attr(1).value.clone();

        if else_start.is_empty() {
            let true_jump = self.pop_backpatch();
            self.fill(true_jump, body_start);
            let false_jump = self.pop_backpatch();
            self.fill(false_jump, self.peek_label().to_string());
        } else {
            let skip_else = self.pop_backpatch();
            self.fill(skip_else, self.peek_label().to_string());
            let true_jump = self.pop_backpatch();
            self.fill(true_jump, body_start);
            let false_jump = self.pop_backpatch();
            self.fill(false_jump, else_start);
        }

        self.synthesize(rhs, Attribute::of(lhs));
    }

    /// `WhileStmt -> while WhileStmt_m1 ( Exp ) WhileStmt_m2 Block`
    fn while_stmt(&mut self, lhs: &str, rhs: &[&str]) {
        let condition = self.attr(6).value.clone();
        let body_start = self.attr(2).value.clone();

        self.emit("j", "-", "-", &condition);
        let true_jump = self.pop_backpatch();
        self.fill(true_jump, body_start);
        let false_jump = self.pop_backpatch();
        self.fill(false_jump, self.peek_label().to_string());

        self.synthesize(rhs, Attribute::of(lhs));
    }

    /// `Dec -> <ID>` and `Dec -> <ID> = Exp`
    fn dec(&mut self, lhs: &str, rhs: &[&str]) -> Result<()> {
        let (id, initializer) = if rhs.len() == 1 {
            (self.attr(1).clone(), None)
        } else {
            (self.attr(3).clone(), Some(self.attr(1).value.clone()))
        };
        let specifier = self.attr(rhs.len() + 1).value.clone();
        let scope = self.current_scope();

        let redefined = self.tables[scope].find(&id.value).is_some();
        if !redefined {
            self.tables[scope].add(IdentInfo::variable(&specifier, &id.value));
            if let Some(value) = initializer {
                self.emit(":=", &value, "-", &id.value);
            }
        }

        self.synthesize(rhs, Attribute::with_value(lhs, id.value.clone(), id.line));
        if redefined {
            return Err(SemanticError::VariableRedefined {
                name: id.value,
                line: id.line.unwrap_or(0),
            });
        }
        Ok(())
    }

    /// `CallFunCheck -> @`, after the callee name and `(` are shifted:
    /// resolves the name in the global table.
    fn call_check(&mut self, lhs: &str) -> Result<()> {
        let fun = self.attr(2).clone();

        let resolved = self.tables[GLOBAL]
            .find(&fun.value)
            .filter(|&entry| self.tables[GLOBAL].get(entry).kind == IdentKind::Function);

        let mut attribute = Attribute::of(lhs);
        attribute.table = resolved.map(|_| GLOBAL);
        attribute.entry = resolved;
        self.attributes.push(attribute);

        match resolved {
            Some(_) => Ok(()),
            None => Err(SemanticError::UndefinedFunctionCall {
                name: fun.value,
                line: fun.line.unwrap_or(0),
            }),
        }
    }

    /// `Args -> Exp , Args | Exp | @`: emits one `param` per argument
    /// and synthesizes the argument count.
    fn args(&mut self, lhs: &str, rhs: &[&str]) {
        match rhs {
            ["@"] => {
                self.synthesize(rhs, Attribute::with_value(lhs, "0".to_owned(), None));
            }
            ["Exp"] => {
                let exp = self.attr(1).value.clone();
                self.emit("param", &exp, "-", "-");
                self.synthesize(rhs, Attribute::with_value(lhs, "1".to_owned(), None));
            }
            _ => {
                let exp = self.attr(3).value.clone();
                self.emit("param", &exp, "-", "-");
                let tail: usize = self
                    .attr(1)
                    .value
                    .parse()
                    .expect("Args frames carry a count");
                let count = (tail + 1).to_string();
                self.synthesize(rhs, Attribute::with_value(lhs, count, None));
            }
        }
    }

    /// The expression shapes of every stratum (`Exp`, `RelExp`,
    /// `ArithExp`, `Atom`); the synthesized value is a literal, an
    /// identifier or a temporary name.
    fn expression(&mut self, lhs: &str, rhs: &[&str]) -> Result<()> {
        match rhs {
            ["<ID>", "Assignop", _] => {
                let id = self.attr(3).value.clone();
                let op = self.attr(2).value.clone();
                let exp = self.attr(1).value.clone();
                if op == "=" {
                    self.emit(":=", &exp, "-", &id);
                } else {
                    self.emit(&op, &id, &exp, &id);
                }
                self.synthesize(rhs, Attribute::with_value(lhs, id, None));
                Ok(())
            }
            [_, "Relop", _] => {
                let left = self.attr(3).value.clone();
                let op = self.attr(2).value.clone();
                let right = self.attr(1).value.clone();
                // (jop, L, R, here+3); (:=, 0); (j, here+4); (:=, 1)
                let here = self.peek_label();
                let temp = self.new_temp();
                self.emit(&format!("j{op}"), &left, &right, &(here + 3).to_string());
                self.emit(":=", "0", "-", &temp);
                self.emit("j", "-", "-", &(here + 4).to_string());
                self.emit(":=", "1", "-", &temp);
                self.synthesize(rhs, Attribute::with_value(lhs, temp, None));
                Ok(())
            }
            [_, "Aritop", _] => {
                let left = self.attr(3).value.clone();
                let op = self.attr(2).value.clone();
                let right = self.attr(1).value.clone();
                let temp = self.new_temp();
                self.emit(&op, &left, &right, &temp);
                self.synthesize(rhs, Attribute::with_value(lhs, temp, None));
                Ok(())
            }
            ["(", _, ")"] => {
                let value = self.attr(2).value.clone();
                self.synthesize(rhs, Attribute::with_value(lhs, value, None));
                Ok(())
            }
            ["<ID>", "(", "CallFunCheck", "Args", ")"] => self.call(lhs, rhs),
            ["<ID>"] | ["<INT>"] | ["<FLOAT>"] => {
                self.copy_up(lhs, rhs);
                Ok(())
            }
            [child] if is_exp_level(child) => {
                self.copy_up(lhs, rhs);
                Ok(())
            }
            _ => {
                self.synthesize(rhs, Attribute::of(lhs));
                Ok(())
            }
        }
    }

    /// `Atom -> <ID> ( CallFunCheck Args )`: checks the argument count
    /// against the callee, then emits the call into a fresh temporary.
    fn call(&mut self, lhs: &str, rhs: &[&str]) -> Result<()> {
        let id = self.attr(5).clone();
        let check = self.attr(3).clone();
        let given: usize = self
            .attr(2)
            .value
            .parse()
            .expect("Args frames carry a count");

        let mut arity_error = None;
        if let (Some(table), Some(entry)) = (check.table, check.entry) {
            let expected = self.tables[table].get(entry).parameter_count;
            if expected > given {
                arity_error = Some(SemanticError::TooFewArguments {
                    name: id.value.clone(),
                    line: id.line.unwrap_or(0),
                });
            } else if expected < given {
                arity_error = Some(SemanticError::TooManyArguments {
                    name: id.value.clone(),
                    line: id.line.unwrap_or(0),
                });
            }
        }

        let temp = self.new_temp();
        self.emit("call", &id.value, "-", &temp);
        self.synthesize(rhs, Attribute::with_value(lhs, temp, None));

        match arity_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
