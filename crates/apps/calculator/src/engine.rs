const MAX_ENTRY_DIGITS: usize = 16;
const MAX_DISPLAY_CHARS: usize = 12;
const EXPONENT_DIGITS: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOp {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "−",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Modulo => "%",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CalcAction {
    Digit(char),
    Decimal,
    ClearEntry,
    ClearAll,
    Binary(BinaryOp),
    ToggleSign,
    Equals,
}

/// xcalc register machine: the visible entry, the stored left operand, and the pending operator.
#[derive(Clone, Debug)]
pub(crate) struct CalculatorState {
    entry: String,
    previous: Option<f64>,
    pending_op: Option<BinaryOp>,
    replace_entry: bool,
    error: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            entry: "0".to_string(),
            previous: None,
            pending_op: None,
            replace_entry: false,
            error: false,
        }
    }
}

impl CalculatorState {
    pub(crate) fn apply(&mut self, action: CalcAction) {
        match action {
            CalcAction::Digit(digit) => self.input_digit(digit),
            CalcAction::Decimal => self.input_decimal(),
            CalcAction::ClearEntry => self.clear_entry(),
            CalcAction::ClearAll => *self = Self::default(),
            CalcAction::Binary(op) => self.set_pending_operation(op),
            CalcAction::ToggleSign => self.toggle_sign(),
            CalcAction::Equals => self.equals(),
        }
    }

    /// Display text; entries longer than the LCD are shown in exponential form.
    pub(crate) fn display_text(&self) -> String {
        if self.error {
            return "Error".to_string();
        }
        if self.entry.chars().count() > MAX_DISPLAY_CHARS {
            if let Ok(value) = self.entry.parse::<f64>() {
                return to_exponential(value, EXPONENT_DIGITS);
            }
        }
        self.entry.clone()
    }

    /// Pending operator indicator, e.g. `12 ×`.
    pub(crate) fn pending_text(&self) -> String {
        match (self.previous, self.pending_op) {
            (Some(previous), Some(op)) => format!("{} {}", format_number(previous), op.symbol()),
            _ => String::new(),
        }
    }

    fn current_value(&self) -> Option<f64> {
        if self.error {
            return None;
        }
        self.entry.parse::<f64>().ok()
    }

    fn start_fresh_entry(&mut self) {
        if self.error {
            *self = Self::default();
        }
        if self.replace_entry {
            self.entry = "0".to_string();
            self.replace_entry = false;
        }
    }

    fn input_digit(&mut self, digit: char) {
        self.start_fresh_entry();

        let digits_only = self.entry.chars().filter(|c| c.is_ascii_digit()).count();
        if digits_only >= MAX_ENTRY_DIGITS {
            return;
        }

        if self.entry == "0" {
            self.entry = digit.to_string();
        } else {
            self.entry.push(digit);
        }
    }

    fn input_decimal(&mut self) {
        self.start_fresh_entry();
        if !self.entry.contains('.') {
            self.entry.push('.');
        }
    }

    fn clear_entry(&mut self) {
        self.error = false;
        self.entry = "0".to_string();
        self.replace_entry = false;
    }

    fn toggle_sign(&mut self) {
        if self.error || self.entry == "0" || self.entry == "0." {
            return;
        }
        match self.entry.strip_prefix('-') {
            Some(positive) => self.entry = positive.to_string(),
            None => self.entry.insert(0, '-'),
        }
    }

    fn set_pending_operation(&mut self, op: BinaryOp) {
        if self.error {
            return;
        }
        // Chained operator: fold the pending operation before storing the new one.
        if self.pending_op.is_some() && !self.replace_entry {
            self.equals();
            if self.error {
                return;
            }
        }
        let Some(current) = self.current_value() else {
            return;
        };

        self.previous = Some(current);
        self.pending_op = Some(op);
        self.replace_entry = true;
    }

    fn equals(&mut self) {
        let (Some(lhs), Some(op)) = (self.previous, self.pending_op) else {
            return;
        };
        let Some(rhs) = self.current_value() else {
            return;
        };

        self.previous = None;
        self.pending_op = None;
        self.replace_entry = true;
        match apply_binary(lhs, op, rhs) {
            Some(result) => self.entry = format_number(result),
            None => {
                self.error = true;
                self.entry = "0".to_string();
            }
        }
    }
}

pub(crate) fn keyboard_action(key: &str) -> Option<CalcAction> {
    match key {
        "0" | "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" => {
            key.chars().next().map(CalcAction::Digit)
        }
        "." | "," => Some(CalcAction::Decimal),
        "+" => Some(CalcAction::Binary(BinaryOp::Add)),
        "-" => Some(CalcAction::Binary(BinaryOp::Subtract)),
        "*" | "x" | "X" => Some(CalcAction::Binary(BinaryOp::Multiply)),
        "/" => Some(CalcAction::Binary(BinaryOp::Divide)),
        "%" => Some(CalcAction::Binary(BinaryOp::Modulo)),
        "=" | "Enter" => Some(CalcAction::Equals),
        "Delete" | "Backspace" => Some(CalcAction::ClearEntry),
        "Escape" => Some(CalcAction::ClearAll),
        "F9" => Some(CalcAction::ToggleSign),
        _ => None,
    }
}

/// `None` when the operation has no finite result (division or modulo by zero, overflow).
fn apply_binary(lhs: f64, op: BinaryOp, rhs: f64) -> Option<f64> {
    let result = match op {
        BinaryOp::Add => lhs + rhs,
        BinaryOp::Subtract => lhs - rhs,
        BinaryOp::Multiply => lhs * rhs,
        BinaryOp::Divide if rhs == 0.0 => return None,
        BinaryOp::Divide => lhs / rhs,
        BinaryOp::Modulo => lhs % rhs,
    };
    result.is_finite().then_some(result)
}

pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

fn to_exponential(value: f64, digits: usize) -> String {
    let text = format!("{value:.digits$e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}
