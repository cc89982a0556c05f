use super::TypeTranslator;
use crate::ast::{FunctionSignature, Param};
use crate::capture::ErrorCapturer;
use crate::error::{ParserError, ParserErrorKind};
use crate::ir::{AliasMap, FunctionTypeAnnotation, NamedShape, NullableAnnotation, TypeAnnotation};
use crate::nullable::{unwrap_nullable, wrap_nullable};

impl<'a> TypeTranslator<'a> {
    /// Translate a call signature. A faulty parameter is dropped and recorded;
    /// a faulty return type fails the whole function.
    pub fn translate_function(
        &self,
        signature: &'a FunctionSignature,
        aliases: &mut AliasMap,
        capturer: &mut ErrorCapturer,
    ) -> Result<FunctionTypeAnnotation, ParserError> {
        let mut params = Vec::new();
        for param in &signature.params {
            let translated =
                capturer.capture(|capturer| self.translate_param(param, aliases, capturer))?;
            params.extend(translated);
        }

        let Some(return_node) = signature.return_type.as_deref() else {
            return Err(self.error(
                signature.span,
                ParserErrorKind::UnsupportedFunctionReturnTypeAnnotation {
                    found: "a missing return type".into(),
                },
            ));
        };
        let (return_type, nullable) =
            unwrap_nullable(self.translate(return_node, aliases, capturer)?);
        if !self.is_cxx_only() && matches!(return_type, TypeAnnotation::Function(_)) {
            return Err(self.error(
                return_node.span,
                ParserErrorKind::UnsupportedFunctionReturnTypeAnnotation {
                    found: return_type.kind_name().into(),
                },
            ));
        }

        Ok(FunctionTypeAnnotation {
            params,
            return_type_annotation: Box::new(wrap_nullable(nullable, return_type)),
        })
    }

    fn translate_param(
        &self,
        param: &'a Param,
        aliases: &mut AliasMap,
        capturer: &mut ErrorCapturer,
    ) -> Result<NamedShape<NullableAnnotation>, ParserError> {
        let Some(annotation) = &param.type_annotation else {
            return Err(self.error(param.span, ParserErrorKind::UnnamedFunctionParam));
        };

        let (param_type, nullable) = unwrap_nullable(self.translate(annotation, aliases, capturer)?);
        if matches!(param_type, TypeAnnotation::Void | TypeAnnotation::Promise) {
            return Err(self.error(
                annotation.span,
                ParserErrorKind::UnsupportedFunctionParamTypeAnnotation {
                    name: param.name.name.clone(),
                    found: param_type.kind_name().into(),
                },
            ));
        }

        Ok(NamedShape::new(
            param.name.name.as_str(),
            param.optional,
            wrap_nullable(nullable, param_type),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ident, Keyword, Program, Span, TypeKind, TypeNode};
    use crate::env::TypeEnvironment;

    fn param(name: &str, type_annotation: Option<TypeNode>) -> Param {
        Param {
            name: Ident::new(name, Span::default()),
            optional: false,
            type_annotation,
            span: Span::default(),
        }
    }

    fn signature(params: Vec<Param>, return_type: Option<TypeNode>) -> FunctionSignature {
        FunctionSignature {
            params,
            return_type: return_type.map(Box::new),
            span: Span::default(),
        }
    }

    fn translate(
        signature: &FunctionSignature,
        cxx_only: bool,
    ) -> (Result<FunctionTypeAnnotation, ParserError>, Vec<ParserError>) {
        let program = Program::default();
        let env = TypeEnvironment::new(&program);
        let translator = TypeTranslator::new("NativeTest", &env, cxx_only);
        let mut capturer = ErrorCapturer::new();
        let result = translator.translate_function(signature, &mut AliasMap::new(), &mut capturer);
        (result, capturer.into_errors())
    }

    #[test]
    fn faulty_params_are_dropped() {
        let sig = signature(
            vec![
                param("a", Some(TypeNode::keyword(Keyword::Number))),
                param("b", None),
                param("c", Some(TypeNode::keyword(Keyword::Void))),
                param("d", Some(TypeNode::keyword(Keyword::String))),
            ],
            Some(TypeNode::keyword(Keyword::Void)),
        );
        let (result, errors) = translate(&sig, false);
        let function = result.unwrap();
        let names: Vec<_> = function.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "d"]);
        let codes: Vec<_> = errors.iter().map(|e| e.kind.code()).collect();
        assert_eq!(
            codes,
            ["UnnamedFunctionParam", "UnsupportedFunctionParamTypeAnnotation"]
        );
    }

    #[test]
    fn missing_return_type_fails_function() {
        let (result, _) = translate(&signature(vec![], None), false);
        assert_eq!(
            result.unwrap_err().kind.code(),
            "UnsupportedFunctionReturnTypeAnnotation"
        );
    }

    #[test]
    fn function_returns_need_cxx_modules() {
        let callback = TypeNode::new(
            TypeKind::Function(signature(vec![], Some(TypeNode::keyword(Keyword::Void)))),
            Span::default(),
        );
        let sig = signature(vec![], Some(callback));
        let (result, _) = translate(&sig, false);
        assert!(result.is_err());
        let (result, _) = translate(&sig, true);
        assert_eq!(
            result.unwrap().return_type_annotation.value.kind_name(),
            "FunctionTypeAnnotation"
        );
    }
}
