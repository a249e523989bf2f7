// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The host-runtime global member table.
//!
//! Free identifiers that resolve to nothing local rewrite to `$p.<name>`
//! exactly when they appear here (or in the host-supplied option sets).
//! The table is the authoritative list of Processing API names the host
//! runtime exposes, plus the `__*` helpers the expression rewrites
//! introduce. Additions at runtime come only from `aFunctions` keys and
//! library `exports`.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Processing API built-ins and transformer helpers, as exposed on `$p`.
#[rustfmt::skip]
pub(crate) const RUNTIME_MEMBERS: &[&str] = &[
    "abs", "acos", "alpha", "ambient", "ambientLight", "append", "applyMatrix",
    "arc", "arrayCopy", "asin", "atan", "atan2",
    "background", "beginCamera", "beginContour", "beginDraw", "beginShape",
    "bezier", "bezierDetail", "bezierPoint", "bezierTangent", "bezierVertex",
    "binary", "blend", "blendColor", "blue", "box", "breakShape", "brightness",
    "camera", "ceil", "color", "colorMode", "concat", "constrain", "copy",
    "cos", "createFont", "createGraphics", "createImage", "createInput",
    "createOutput", "createReader", "createWriter", "cursor", "curve",
    "curveDetail", "curvePoint", "curveTangent", "curveTightness",
    "curveVertex",
    "day", "degrees", "directionalLight", "disableContextMenu", "dist",
    "draw",
    "ellipse", "ellipseMode", "emissive", "enableContextMenu", "endCamera",
    "endContour", "endDraw", "endShape", "exit", "exp", "expand", "externals",
    "fill", "filter", "floor", "focused", "frameCount", "frameRate",
    "frustum",
    "get", "green",
    "height", "hex", "hint", "hour", "hue",
    "image", "imageMode", "intersect",
    "join",
    "key", "keyCode", "keyPressed", "keyReleased", "keyTyped",
    "lerp", "lerpColor", "lightFalloff", "lights", "lightSpecular", "line",
    "link", "loadBytes", "loadFont", "loadImage", "loadPixels", "loadShape",
    "loadStrings", "loadXML", "log", "loop",
    "mag", "map", "match", "matchAll", "max", "millis", "min", "minute",
    "modelX", "modelY", "modelZ", "month", "mouseButton", "mouseClicked",
    "mouseDragged", "mouseMoved", "mouseOut", "mouseOver", "mousePressed",
    "mouseReleased", "mouseScroll", "mouseScrolled", "mouseX", "mouseY",
    "nf", "nfc", "nfp", "nfs", "noCursor", "noFill", "noise", "noiseDetail",
    "noiseSeed", "noLights", "noLoop", "norm", "normal", "noSmooth",
    "noStroke", "noTint",
    "ortho",
    "param", "parseBoolean", "parseByte", "parseChar", "parseFloat",
    "parseInt", "peg", "perspective", "pixels", "pmouseX", "pmouseY",
    "point", "pointLight", "popMatrix", "popStyle", "pow", "print",
    "printCamera", "println", "printMatrix", "printProjection", "pushMatrix",
    "pushStyle",
    "quad",
    "radians", "random", "randomGaussian", "randomSeed", "rect", "rectMode",
    "red", "redraw", "requestImage", "resetMatrix", "reverse", "rotate",
    "rotateX", "rotateY", "rotateZ", "round",
    "saturation", "save", "saveBytes", "saveFrame", "saveStrings", "scale",
    "screenX", "screenY", "screenZ", "second", "set", "setup", "shape",
    "shapeMode", "shearX", "shearY", "shininess", "shorten", "sin", "size",
    "smooth", "sort", "specular", "sphere", "sphereDetail", "splice",
    "split", "splitTokens", "spotLight", "sq", "sqrt", "status", "str",
    "stroke", "strokeCap", "strokeJoin", "strokeWeight", "subset",
    "tan", "text", "textAlign", "textAscent", "textDescent", "textFont",
    "textLeading", "textMode", "textSize", "texture", "textureMode",
    "textWidth", "tint", "toImageData", "touchCancel", "touchEnd",
    "touchMove", "touchStart", "translate", "triangle", "trim",
    "unbinary", "unhex", "updatePixels",
    "vertex",
    "width",
    "year",
    // Host-provided types.
    "ArrayList", "Character", "HashMap", "PFont", "PGraphics", "PImage",
    "PMatrix2D", "PMatrix3D", "PShape", "PShapeSVG", "PVector", "XML",
    "XMLElement",
    // Helpers introduced by the expression rewrites.
    "__codePointAt", "__contains", "__endsWith", "__equals",
    "__equalsIgnoreCase", "__frameRate", "__hashCode", "__instanceof",
    "__int_cast", "__keyPressed", "__matches", "__mousePressed",
    "__printStackTrace", "__replace", "__replaceAll", "__replaceFirst",
    "__split", "__startsWith", "__toCharArray",
];

static MEMBER_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| RUNTIME_MEMBERS.iter().copied().collect());

/// Whether `name` is a member of the host runtime object.
pub(crate) fn is_runtime_member(name: &str) -> bool {
    MEMBER_SET.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_names_resolve() {
        assert!(is_runtime_member("ellipse"));
        assert!(is_runtime_member("__instanceof"));
        assert!(is_runtime_member("parseInt"));
        assert!(!is_runtime_member("createJavaArray"));
        assert!(!is_runtime_member("myVariable"));
    }

    #[test]
    fn no_duplicate_members() {
        let mut seen = HashSet::new();
        for name in RUNTIME_MEMBERS {
            assert!(seen.insert(name), "duplicate member {name}");
        }
    }
}
