use crate::{BoolOp, Literal, grammar::Reduce};

/// Legal values of a filter type, as offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueDomain {
    Choices(Vec<String>),
    /// No enumerable domain (card name, card text, ...).
    FreeText,
}

/// Answers "what may the user pick for this filter type".
pub trait DomainSource {
    fn domain(&self, filter_type: &str) -> ValueDomain;
}

impl<F> DomainSource for F
where
    F: Fn(&str) -> ValueDomain,
{
    fn domain(&self, filter_type: &str) -> ValueDomain {
        self(filter_type)
    }
}

/// Descriptor of one element of the filter-editing form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    Label(String),
    TextEntry {
        filter_type: String,
        variable: String,
    },
    ChoiceList {
        filter_type: String,
        variable: String,
        choices: Vec<String>,
    },
}

impl Widget {
    fn label(text: impl Into<String>) -> Self {
        Widget::Label(text.into())
    }

    /// The `$variable` this widget fills in, if it is an input widget.
    pub fn variable(&self) -> Option<&str> {
        match self {
            Widget::Label(_) => None,
            Widget::TextEntry { variable, .. } | Widget::ChoiceList { variable, .. } => {
                Some(variable)
            }
        }
    }
}

/// Reduces the grammar into a flat, left-to-right list of widgets. Literal
/// parts become labels; only `$variable` slots get input widgets.
pub struct WidgetBuilder<'d, D: ?Sized> {
    domains: &'d D,
}

impl<'d, D: DomainSource + ?Sized> WidgetBuilder<'d, D> {
    pub fn new(domains: &'d D) -> Self {
        Self { domains }
    }
}

impl<D: DomainSource + ?Sized> Reduce for WidgetBuilder<'_, D> {
    type Output = Vec<Widget>;

    fn filter(&mut self, root: Option<Vec<Widget>>) -> Vec<Widget> {
        root.unwrap_or_default()
    }

    fn binary(&mut self, mut left: Vec<Widget>, op: BoolOp, right: Vec<Widget>) -> Vec<Widget> {
        left.push(Widget::label(op.to_string()));
        left.extend(right);
        left
    }

    fn not(&mut self, inner: Vec<Widget>) -> Vec<Widget> {
        let mut widgets = vec![Widget::label("NOT")];
        widgets.extend(inner);
        widgets
    }

    fn literal(&mut self, literal: Literal) -> Vec<Widget> {
        vec![Widget::label(literal.to_string())]
    }

    fn comma(&mut self, mut left: Vec<Widget>, right: Vec<Widget>) -> Vec<Widget> {
        left.push(Widget::label(","));
        left.extend(right);
        left
    }

    fn filter_part(&mut self, filter_type: &str, values: Vec<Widget>) -> Vec<Widget> {
        let mut widgets = vec![Widget::label(filter_type), Widget::label("=")];
        widgets.extend(values);
        widgets
    }

    fn variable_part(&mut self, filter_type: &str, variable: &str) -> Vec<Widget> {
        let input = match self.domains.domain(filter_type) {
            ValueDomain::Choices(choices) => Widget::ChoiceList {
                filter_type: filter_type.to_string(),
                variable: variable.to_string(),
                choices,
            },
            ValueDomain::FreeText => Widget::TextEntry {
                filter_type: filter_type.to_string(),
                variable: variable.to_string(),
            },
        };
        vec![Widget::label(filter_type), Widget::label("="), input]
    }

    fn group(&mut self, inner: Vec<Widget>) -> Vec<Widget> {
        let mut widgets = vec![Widget::label("(")];
        widgets.extend(inner);
        widgets.push(Widget::label(")"));
        widgets
    }
}
