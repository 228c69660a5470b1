use knuffel::errors::DecodeError;

/// Number that accepts both integer and decimal literals.
///
/// MIN and MAX are only used during parsing to check the value.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FloatOrInt<const MIN: i32, const MAX: i32>(pub f64);

impl<const MIN: i32, const MAX: i32> FloatOrInt<MIN, MAX> {
    fn in_range(value: f64) -> bool {
        (f64::from(MIN)..=f64::from(MAX)).contains(&value)
    }
}

impl<const MIN: i32, const MAX: i32> From<FloatOrInt<MIN, MAX>> for f64 {
    fn from(value: FloatOrInt<MIN, MAX>) -> Self {
        value.0
    }
}

impl<S: knuffel::traits::ErrorSpan, const MIN: i32, const MAX: i32> knuffel::DecodeScalar<S>
    for FloatOrInt<MIN, MAX>
{
    fn type_check(
        type_name: &Option<knuffel::span::Spanned<knuffel::ast::TypeName, S>>,
        ctx: &mut knuffel::decode::Context<S>,
    ) {
        if let Some(type_name) = &type_name {
            ctx.emit_error(DecodeError::unexpected(
                type_name,
                "type name",
                "no type name expected for this node",
            ));
        }
    }

    fn raw_decode(
        val: &knuffel::span::Spanned<knuffel::ast::Literal, S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<Self, DecodeError<S>> {
        let value: Result<f64, String> = match &**val {
            knuffel::ast::Literal::Int(ref value) => {
                i32::try_from(value).map(f64::from).map_err(|e| e.to_string())
            }
            knuffel::ast::Literal::Decimal(ref value) => {
                f64::try_from(value).map_err(|e| e.to_string())
            }
            _ => {
                ctx.emit_error(DecodeError::unsupported(
                    val,
                    "Unsupported value, only numbers are recognized",
                ));
                return Ok(FloatOrInt::default());
            }
        };

        match value {
            Ok(v) if Self::in_range(v) => Ok(FloatOrInt(v)),
            Ok(_) => {
                ctx.emit_error(DecodeError::conversion(
                    val,
                    format!("value must be between {MIN} and {MAX}"),
                ));
                Ok(FloatOrInt::default())
            }
            Err(e) => {
                ctx.emit_error(DecodeError::conversion(val, e));
                Ok(FloatOrInt::default())
            }
        }
    }
}
